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
use std::sync::Arc;

use arrow_array::RecordBatch;
use geobridge_common::{FileSplitter, Result};

use crate::bridge::SpatialBridge;
use crate::dataframe::DataFrame;
use crate::rdd::SpatialRdd;

/// Entry point to a spatial engine
///
/// Owns the bridge connection; everything created through the context
/// shares it. Cloning the context is cheap and clones share the engine.
#[derive(Clone)]
pub struct SpatialContext {
    bridge: Arc<dyn SpatialBridge>,
}

impl SpatialContext {
    pub fn new(bridge: Arc<dyn SpatialBridge>) -> Self {
        Self { bridge }
    }

    /// Direct access to the underlying bridge
    pub fn bridge(&self) -> &Arc<dyn SpatialBridge> {
        &self.bridge
    }

    /// Register local record batches as a remote dataframe
    pub fn create_data_frame(&self, batches: Vec<RecordBatch>) -> Result<DataFrame> {
        let href = self.bridge.create_data_frame(batches)?;
        Ok(DataFrame::new(self.bridge.clone(), href))
    }

    /// Load a point collection from a delimited text file
    ///
    /// `offset` is the column index of the x coordinate; y follows it and
    /// the remaining columns become record attributes.
    pub fn create_point_rdd(
        &self,
        location: &str,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<SpatialRdd> {
        let href = self
            .bridge
            .create_point_rdd(location, splitter, offset, num_partitions)?;
        Ok(SpatialRdd::new(self.bridge.clone(), href))
    }

    /// Load an axis-aligned rectangle collection from a delimited text file
    ///
    /// `offset` is the column index of `min_x`; the engine reads the four
    /// bounds as `min_x, min_y, max_x, max_y`.
    pub fn create_rectangle_rdd(
        &self,
        location: &str,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<SpatialRdd> {
        let href = self
            .bridge
            .create_rectangle_rdd(location, splitter, offset, num_partitions)?;
        Ok(SpatialRdd::new(self.bridge.clone(), href))
    }

    /// Load a polygon collection from a WKT (or delimited) text file
    pub fn create_polygon_rdd(
        &self,
        location: &str,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<SpatialRdd> {
        let href = self
            .bridge
            .create_polygon_rdd(location, splitter, offset, num_partitions)?;
        Ok(SpatialRdd::new(self.bridge.clone(), href))
    }
}
