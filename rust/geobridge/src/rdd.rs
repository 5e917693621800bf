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

//! Owned handles to remote spatial collections
//!
//! A handle is valid while its bridge is alive and until released. Handles
//! release their remote object on drop; [SpatialRdd::release] and friends
//! make the release explicit and surface the engine's response. Release
//! failures during drop are logged and otherwise ignored.
use std::fmt;
use std::sync::Arc;

use geobridge_common::{BridgeError, GridType, IndexType, Result};
use geobridge_geometry::Envelope;

use crate::bridge::{AnyRef, GroupedRef, PairRef, PartitionerRef, RddRef, RddStats, SpatialBridge};
use crate::record::SpatialRecord;

/// Handle to a remote distributed spatial collection
///
/// A thin wrapper: indexing and partitioning are remote calls, and the only
/// local work is parameter validation.
pub struct SpatialRdd {
    bridge: Arc<dyn SpatialBridge>,
    href: RddRef,
    released: bool,
}

impl SpatialRdd {
    pub(crate) fn new(bridge: Arc<dyn SpatialBridge>, href: RddRef) -> Self {
        Self {
            bridge,
            href,
            released: false,
        }
    }

    pub(crate) fn bridge(&self) -> &Arc<dyn SpatialBridge> {
        &self.bridge
    }

    pub(crate) fn href(&self) -> Result<RddRef> {
        if self.released {
            Err(BridgeError::InvalidHandle(
                "spatial RDD handle was already released".to_string(),
            ))
        } else {
            Ok(self.href)
        }
    }

    /// Count the records and compute the collection boundary
    pub fn analyze(&self) -> Result<RddStats> {
        self.bridge.analyze(self.href()?)
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.analyze()?.count)
    }

    /// Merged bounds of all records, `None` for an empty collection
    pub fn boundary_envelope(&self) -> Result<Option<Envelope>> {
        Ok(self.analyze()?.boundary)
    }

    /// Partition the collection across `num_partitions` grid cells
    ///
    /// Returns the partitioner so the other side of a join can be
    /// partitioned with [SpatialRdd::spatial_partitioning_with].
    pub fn spatial_partitioning(
        &self,
        grid_type: GridType,
        num_partitions: usize,
    ) -> Result<SpatialPartitioner> {
        if num_partitions == 0 {
            return Err(BridgeError::Invalid(
                "num_partitions must be at least 1".to_string(),
            ));
        }

        let href = self
            .bridge
            .spatial_partitioning(self.href()?, grid_type, num_partitions)?;
        Ok(SpatialPartitioner {
            bridge: self.bridge.clone(),
            href,
            grid_type,
            released: false,
        })
    }

    /// Partition this collection with another collection's partitioner
    pub fn spatial_partitioning_with(&self, partitioner: &SpatialPartitioner) -> Result<()> {
        self.bridge
            .spatial_partitioning_with(self.href()?, partitioner.href()?)
    }

    /// Build a spatial index in place
    ///
    /// With `build_on_spatial_partitioned_rdd` the index is built per
    /// partition (required for indexed joins); otherwise it is built over
    /// the raw collection (used by KNN queries).
    pub fn build_index(
        &self,
        index_type: IndexType,
        build_on_spatial_partitioned_rdd: bool,
    ) -> Result<()> {
        self.bridge
            .build_index(self.href()?, index_type, build_on_spatial_partitioned_rdd)
    }

    /// Materialize the full collection locally
    pub fn collect(&self) -> Result<Vec<SpatialRecord>> {
        self.bridge.collect_rdd(self.href()?)
    }

    /// Release the remote collection
    pub fn release(mut self) -> Result<()> {
        let href = self.href()?;
        self.released = true;
        self.bridge.release(AnyRef::Rdd(href))
    }
}

// The bridge field is a trait object, so Debug is written out by hand
impl fmt::Debug for SpatialRdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialRdd")
            .field("href", &self.href)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl Drop for SpatialRdd {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.bridge.release(AnyRef::Rdd(self.href)) {
                log::debug!("failed to release spatial RDD handle: {e}");
            }
        }
    }
}

/// Handle to a remote spatial partitioner
///
/// Obtained from [SpatialRdd::spatial_partitioning]; both join inputs must
/// be partitioned by the same partitioner.
pub struct SpatialPartitioner {
    bridge: Arc<dyn SpatialBridge>,
    href: PartitionerRef,
    grid_type: GridType,
    released: bool,
}

impl SpatialPartitioner {
    pub(crate) fn href(&self) -> Result<PartitionerRef> {
        if self.released {
            Err(BridgeError::InvalidHandle(
                "spatial partitioner handle was already released".to_string(),
            ))
        } else {
            Ok(self.href)
        }
    }

    /// The grid strategy this partitioner was built with
    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }

    pub fn release(mut self) -> Result<()> {
        let href = self.href()?;
        self.released = true;
        self.bridge.release(AnyRef::Partitioner(href))
    }
}

impl fmt::Debug for SpatialPartitioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialPartitioner")
            .field("href", &self.href)
            .field("grid_type", &self.grid_type)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl Drop for SpatialPartitioner {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.bridge.release(AnyRef::Partitioner(self.href)) {
                log::debug!("failed to release partitioner handle: {e}");
            }
        }
    }
}

/// Handle to a flat join result: one record per matched pair
pub struct SpatialPairRdd {
    bridge: Arc<dyn SpatialBridge>,
    href: PairRef,
    released: bool,
}

impl SpatialPairRdd {
    pub(crate) fn new(bridge: Arc<dyn SpatialBridge>, href: PairRef) -> Self {
        Self {
            bridge,
            href,
            released: false,
        }
    }

    pub(crate) fn bridge(&self) -> &Arc<dyn SpatialBridge> {
        &self.bridge
    }

    pub(crate) fn href(&self) -> Result<PairRef> {
        if self.released {
            Err(BridgeError::InvalidHandle(
                "pair RDD handle was already released".to_string(),
            ))
        } else {
            Ok(self.href)
        }
    }

    /// Materialize all (query window, matched object) pairs locally
    pub fn collect(&self) -> Result<Vec<(SpatialRecord, SpatialRecord)>> {
        self.bridge.collect_pairs(self.href()?)
    }

    pub fn release(mut self) -> Result<()> {
        let href = self.href()?;
        self.released = true;
        self.bridge.release(AnyRef::Pair(href))
    }
}

impl fmt::Debug for SpatialPairRdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialPairRdd")
            .field("href", &self.href)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl Drop for SpatialPairRdd {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.bridge.release(AnyRef::Pair(self.href)) {
                log::debug!("failed to release pair RDD handle: {e}");
            }
        }
    }
}

/// Handle to a join result grouped by query window
pub struct GroupedResultRdd {
    bridge: Arc<dyn SpatialBridge>,
    href: GroupedRef,
    released: bool,
}

impl GroupedResultRdd {
    pub(crate) fn new(bridge: Arc<dyn SpatialBridge>, href: GroupedRef) -> Self {
        Self {
            bridge,
            href,
            released: false,
        }
    }

    pub(crate) fn href(&self) -> Result<GroupedRef> {
        if self.released {
            Err(BridgeError::InvalidHandle(
                "grouped result handle was already released".to_string(),
            ))
        } else {
            Ok(self.href)
        }
    }

    /// Materialize the grouped result: each matched query window with its
    /// deduplicated set of matched objects
    pub fn collect(&self) -> Result<Vec<(SpatialRecord, Vec<SpatialRecord>)>> {
        self.bridge.collect_grouped(self.href()?)
    }

    pub fn release(mut self) -> Result<()> {
        let href = self.href()?;
        self.released = true;
        self.bridge.release(AnyRef::Grouped(href))
    }
}

impl fmt::Debug for GroupedResultRdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupedResultRdd")
            .field("href", &self.href)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl Drop for GroupedResultRdd {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.bridge.release(AnyRef::Grouped(self.href)) {
                log::debug!("failed to release grouped result handle: {e}");
            }
        }
    }
}
