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

//! Spatial join requests
//!
//! Both inputs must already be partitioned by the same partitioner (use
//! [crate::rdd::SpatialRdd::spatial_partitioning] on one side and
//! [crate::rdd::SpatialRdd::spatial_partitioning_with] on the other).
//! Indexed joins additionally require an index built on the partitioned
//! collection.
use geobridge_common::{IndexType, JoinBuildSide, Result};
use serde::{Deserialize, Serialize};

use crate::rdd::{GroupedResultRdd, SpatialPairRdd, SpatialRdd};

/// Execution parameters for a spatial join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinParams {
    /// Probe a pre-built index instead of scanning each bucket
    pub use_index: bool,
    pub index_type: IndexType,
    /// Which input the engine builds its per-bucket lookup structure on.
    /// Affects performance only, never the result set.
    pub build_side: JoinBuildSide,
    /// Match on intersection when true, on containment (window contains
    /// object) when false
    pub consider_boundary_intersection: bool,
    /// Keep one output pair per grid cell in which the pair matched; when
    /// false each pair appears exactly once
    pub preserve_duplicates: bool,
}

impl Default for JoinParams {
    fn default() -> Self {
        Self {
            use_index: true,
            index_type: IndexType::RTree,
            build_side: JoinBuildSide::Left,
            consider_boundary_intersection: true,
            preserve_duplicates: true,
        }
    }
}

impl JoinParams {
    pub fn new(use_index: bool, consider_boundary_intersection: bool) -> Self {
        Self {
            use_index,
            consider_boundary_intersection,
            ..Default::default()
        }
    }
}

/// Issues spatial join requests against the engine
pub struct JoinQuery;

impl JoinQuery {
    /// Join grouped by query window
    ///
    /// Each output element is a matched window with its deduplicated set of
    /// matched objects; windows without matches are omitted.
    pub fn spatial_join_query(
        spatial_rdd: &SpatialRdd,
        query_rdd: &SpatialRdd,
        use_index: bool,
        consider_boundary_intersection: bool,
    ) -> Result<GroupedResultRdd> {
        let params = JoinParams {
            preserve_duplicates: false,
            ..JoinParams::new(use_index, consider_boundary_intersection)
        };
        let href = spatial_rdd.bridge().spatial_join_grouped(
            spatial_rdd.href()?,
            query_rdd.href()?,
            &params,
        )?;
        Ok(GroupedResultRdd::new(spatial_rdd.bridge().clone(), href))
    }

    /// Flat join: one output pair per (window, object) match
    pub fn spatial_join_query_flat(
        spatial_rdd: &SpatialRdd,
        query_rdd: &SpatialRdd,
        use_index: bool,
        consider_boundary_intersection: bool,
    ) -> Result<SpatialPairRdd> {
        let params = JoinParams {
            preserve_duplicates: false,
            ..JoinParams::new(use_index, consider_boundary_intersection)
        };
        Self::spatial_join(query_rdd, spatial_rdd, &params)
    }

    /// Flat join with full parameter control
    ///
    /// With `preserve_duplicates`, a pair matched in several grid cells
    /// appears once per cell, so counts depend on the partitioning.
    pub fn spatial_join(
        query_rdd: &SpatialRdd,
        spatial_rdd: &SpatialRdd,
        params: &JoinParams,
    ) -> Result<SpatialPairRdd> {
        let href =
            spatial_rdd
                .bridge()
                .spatial_join(spatial_rdd.href()?, query_rdd.href()?, params)?;
        Ok(SpatialPairRdd::new(spatial_rdd.bridge().clone(), href))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = JoinParams::default();
        assert!(params.use_index);
        assert!(params.consider_boundary_intersection);
        assert!(params.preserve_duplicates);
        assert_eq!(params.index_type, IndexType::RTree);
        assert_eq!(params.build_side, JoinBuildSide::Left);
    }

    #[test]
    fn params_round_trip_as_json() {
        let params = JoinParams::new(false, false);
        let text = serde_json::to_string(&params).unwrap();
        let back: JoinParams = serde_json::from_str(&text).unwrap();
        assert_eq!(params, back);
    }
}
