// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
use std::io::Write;

use tempfile::NamedTempFile;

/// Five axis-aligned rectangles as `min_x,min_y,max_x,max_y` plus two
/// attribute columns.
///
/// Intersection structure (closed boundaries): a-b overlap, b-c overlap,
/// b-d touch at the single corner (2, 6), e is disjoint from everything
/// else. Self-joining this set therefore yields 11 deduplicated ordered
/// matches: 5 self matches plus both orientations of the three
/// intersecting pairs.
pub const RECTANGLES_CSV: &str = "\
0,0,4,4,alpha,10
2,2,6,6,bravo,20
5,5,9,9,charlie,30
0,6,2,9,delta,40
7,0,9,2,echo,50
";

/// Ten points on the x axis, `x,y` plus one name attribute
pub const POINTS_CSV: &str = "\
0,0,p0
1,0,p1
2,0,p2
3,0,p3
4,0,p4
5,0,p5
6,0,p6
7,0,p7
8,0,p8
9,0,p9
";

/// Tab-delimited WKT geometries of mixed types with one attribute column
pub const MIXED_WKT_TSV: &str = "\
POINT(1 1)\tsolo
LINESTRING(0 0,2 0,2 2)\tpath
POLYGON((0 0,3 0,3 3,0 3,0 0))\tpatch
";

/// Write fixture text to a temp file and return the open handle
///
/// The file is deleted when the returned handle drops, so callers must keep
/// it alive for the duration of the test.
pub fn fixture_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create fixture file");
    file.write_all(contents.as_bytes())
        .expect("write fixture file");
    file.flush().expect("flush fixture file");
    file
}
