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
use arrow_array::RecordBatch;
use arrow_schema::SchemaRef;

use geobridge_common::{FileSplitter, GridType, IndexType, Result};
use geobridge_geometry::{Envelope, Geometry};

use crate::functions::SpatialFunctions;
use crate::join::JoinParams;
use crate::record::SpatialRecord;

/// Remote object identifier
///
/// Ids are engine-scoped: a handle minted by one bridge is meaningless to
/// another and using it there is an `InvalidHandle` error.
pub type HandleId = u64;

macro_rules! handle_ref {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(HandleId);

        impl $name {
            pub fn new(id: HandleId) -> Self {
                Self(id)
            }

            pub fn id(&self) -> HandleId {
                self.0
            }
        }
    };
}

handle_ref!(
    /// Reference to a remote dataframe
    DfRef
);
handle_ref!(
    /// Reference to a remote spatial collection
    RddRef
);
handle_ref!(
    /// Reference to a remote collection of join result pairs
    PairRef
);
handle_ref!(
    /// Reference to a remote join result grouped by query window
    GroupedRef
);
handle_ref!(
    /// Reference to a remote spatial partitioner
    PartitionerRef
);

/// Any releasable remote reference, for [SpatialBridge::release]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyRef {
    Df(DfRef),
    Rdd(RddRef),
    Pair(PairRef),
    Grouped(GroupedRef),
    Partitioner(PartitionerRef),
}

/// Collection statistics produced by [SpatialBridge::analyze]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RddStats {
    pub count: usize,
    /// Merged bounds of all records, `None` for an empty collection
    pub boundary: Option<Envelope>,
}

/// The complete remote interface consumed by the client layer
///
/// This trait replaces the dynamic cross-language dispatch of the wrapped
/// engine's original adapter with an explicit, statically checkable
/// contract: every method is one remote entry point, invoked synchronously.
/// Implementations own all spatial computation; callers only forward
/// parameters and hold the returned references.
///
/// The three dataframe-to-spatial-RDD conversions are distinct methods on
/// purpose. The original surface exposed them as same-named overloads that
/// shadowed each other; here each variant is reachable and individually
/// testable.
pub trait SpatialBridge: SpatialFunctions + Send + Sync {
    // -- dataframe surface ---------------------------------------------------

    /// Register a dataframe from local record batches; all batches must share
    /// one schema
    fn create_data_frame(&self, batches: Vec<RecordBatch>) -> Result<DfRef>;

    fn data_frame_schema(&self, df: DfRef) -> Result<SchemaRef>;

    /// Materialize the full remote dataframe locally
    fn collect_data_frame(&self, df: DfRef) -> Result<Vec<RecordBatch>>;

    // -- adapter entry points ------------------------------------------------

    /// Convert a dataframe to a generic (untyped) spatial collection
    fn df_to_rdd(&self, df: DfRef) -> Result<RddRef>;

    /// Convert a dataframe using its first column as the geometry
    fn df_to_spatial_rdd(&self, df: DfRef) -> Result<RddRef>;

    /// Convert a dataframe using the named geometry column
    fn df_to_spatial_rdd_with_geometry_field(
        &self,
        df: DfRef,
        geometry_field: &str,
    ) -> Result<RddRef>;

    /// Convert a dataframe keeping only the named attribute columns
    fn df_to_spatial_rdd_with_fields(&self, df: DfRef, field_names: &[String]) -> Result<RddRef>;

    /// Convert a spatial collection back to a dataframe
    ///
    /// With `field_names`, the attribute columns take the given names and
    /// their count must match the records' field count; without, the engine
    /// assigns positional names.
    fn rdd_to_df(&self, rdd: RddRef, field_names: Option<&[String]>) -> Result<DfRef>;

    // -- typed construction from delimited text ------------------------------

    fn create_point_rdd(
        &self,
        location: &str,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<RddRef>;

    fn create_rectangle_rdd(
        &self,
        location: &str,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<RddRef>;

    fn create_polygon_rdd(
        &self,
        location: &str,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<RddRef>;

    // -- statistics ----------------------------------------------------------

    fn analyze(&self, rdd: RddRef) -> Result<RddStats>;

    // -- partitioning and indexing -------------------------------------------

    /// Partition the collection, returning the partitioner so the other join
    /// side can be partitioned identically
    fn spatial_partitioning(
        &self,
        rdd: RddRef,
        grid_type: GridType,
        num_partitions: usize,
    ) -> Result<PartitionerRef>;

    /// Re-partition a collection with an existing partitioner
    fn spatial_partitioning_with(&self, rdd: RddRef, partitioner: PartitionerRef) -> Result<()>;

    /// Build a per-partition (or raw-collection) index in place
    fn build_index(
        &self,
        rdd: RddRef,
        index_type: IndexType,
        build_on_spatial_partitioned_rdd: bool,
    ) -> Result<()>;

    // -- joins and KNN -------------------------------------------------------

    /// Flat-pair spatial join of `query` windows against `spatial` objects
    fn spatial_join(&self, spatial: RddRef, query: RddRef, params: &JoinParams)
        -> Result<PairRef>;

    /// Spatial join grouped by query window; windows without matches are
    /// omitted and matches are deduplicated
    fn spatial_join_grouped(
        &self,
        spatial: RddRef,
        query: RddRef,
        params: &JoinParams,
    ) -> Result<GroupedRef>;

    /// K nearest records to `center`, closest first
    fn knn(
        &self,
        rdd: RddRef,
        center: &Geometry,
        k: usize,
        use_index: bool,
    ) -> Result<Vec<SpatialRecord>>;

    // -- result materialization ----------------------------------------------

    fn collect_rdd(&self, rdd: RddRef) -> Result<Vec<SpatialRecord>>;

    fn collect_pairs(&self, pairs: PairRef) -> Result<Vec<(SpatialRecord, SpatialRecord)>>;

    fn collect_grouped(
        &self,
        grouped: GroupedRef,
    ) -> Result<Vec<(SpatialRecord, Vec<SpatialRecord>)>>;

    // -- lifecycle -----------------------------------------------------------

    /// Release a remote object; the reference must not be used afterwards
    fn release(&self, handle: AnyRef) -> Result<()>;
}
