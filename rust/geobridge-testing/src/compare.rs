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
use geobridge_geometry::Geometry;

/// Assert two geometries are equal, printing both as WKT on failure
pub fn assert_geometry_eq(actual: &Geometry, expected: &Geometry) {
    assert_eq!(
        actual,
        expected,
        "geometry mismatch: {} != {}",
        actual.to_wkt(),
        expected.to_wkt()
    );
}

/// Assert a geometry equals the one parsed from `expected_wkt`
pub fn assert_wkt_eq(actual: &Geometry, expected_wkt: &str) {
    let expected = Geometry::from_wkt(expected_wkt).expect("expected WKT must parse");
    assert_geometry_eq(actual, &expected);
}
