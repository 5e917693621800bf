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
use geobridge_common::{BridgeError, Result};
use geobridge_geometry::Geometry;

use crate::rdd::SpatialRdd;
use crate::record::SpatialRecord;

/// Issues K nearest neighbour requests against the engine
pub struct KnnQuery;

impl KnnQuery {
    /// The `k` records nearest to `center`, closest first
    ///
    /// With `use_index` the engine probes an index previously built on the
    /// raw (unpartitioned) collection; asking for an indexed query without
    /// one is an engine error. Fewer than `k` records are returned when the
    /// collection is smaller than `k`.
    pub fn spatial_knn_query(
        rdd: &SpatialRdd,
        center: &Geometry,
        k: usize,
        use_index: bool,
    ) -> Result<Vec<SpatialRecord>> {
        if k == 0 {
            return Err(BridgeError::Invalid(
                "k must be at least 1 for a nearest neighbour query".to_string(),
            ));
        }
        rdd.bridge().knn(rdd.href()?, center, k, use_index)
    }
}
