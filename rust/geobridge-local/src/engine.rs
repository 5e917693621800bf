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

//! The in-process engine behind the bridge contract
//!
//! Remote objects live in handle tables guarded by one lock; handle ids
//! come from an atomic counter and are engine-scoped. Join inputs must be
//! partitioned by the same partitioner, and indexed execution paths
//! require the corresponding index to have been built beforehand.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch, StringArray};
use arrow_cast::display::array_value_to_string;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use geo_types::Geometry as GeoGeometry;
use parking_lot::RwLock;
use rstar::RTree;

use geobridge::bridge::{
    AnyRef, DfRef, GroupedRef, HandleId, PairRef, PartitionerRef, RddRef, RddStats, SpatialBridge,
};
use geobridge::join::JoinParams;
use geobridge::record::USER_DATA_DELIMITER;
use geobridge::SpatialRecord;
use geobridge_common::{BridgeError, FileSplitter, GridType, IndexType, Result};
use geobridge_geometry::{Envelope, Geometry};

use crate::index::{self, EnvelopeEntry};
use crate::measures;
use crate::partition::UniformGrid;
use crate::reader::{self, GeometryKind};

/// Reference implementation of the full bridge contract in one process
pub struct LocalBridge {
    next_id: AtomicU64,
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    dfs: HashMap<HandleId, DfState>,
    rdds: HashMap<HandleId, RddState>,
    pairs: HashMap<HandleId, Vec<(SpatialRecord, SpatialRecord)>>,
    grouped: HashMap<HandleId, Vec<(SpatialRecord, Vec<SpatialRecord>)>>,
    partitioners: HashMap<HandleId, PartitionerState>,
}

struct DfState {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

struct PartitionerState {
    grid: UniformGrid,
    grid_type: GridType,
}

struct RddState {
    records: Vec<SpatialRecord>,
    envelopes: Vec<Option<Envelope>>,
    partitions: Option<PartitionState>,
    raw_index: Option<RTree<EnvelopeEntry>>,
}

struct PartitionState {
    partitioner_id: HandleId,
    /// Record indices per grid bucket; the final bucket is the overflow
    buckets: Vec<Vec<usize>>,
    /// Per-bucket R-trees over global record indices
    indexes: Option<Vec<RTree<EnvelopeEntry>>>,
}

impl RddState {
    fn new(records: Vec<SpatialRecord>) -> Self {
        let envelopes = records.iter().map(|r| r.geometry().envelope()).collect();
        Self {
            records,
            envelopes,
            partitions: None,
            raw_index: None,
        }
    }
}

impl Tables {
    fn df(&self, href: DfRef) -> Result<&DfState> {
        self.dfs
            .get(&href.id())
            .ok_or_else(|| unknown_handle("dataframe", href.id()))
    }

    fn rdd(&self, href: RddRef) -> Result<&RddState> {
        self.rdds
            .get(&href.id())
            .ok_or_else(|| unknown_handle("spatial RDD", href.id()))
    }

    fn rdd_mut(&mut self, href: RddRef) -> Result<&mut RddState> {
        self.rdds
            .get_mut(&href.id())
            .ok_or_else(|| unknown_handle("spatial RDD", href.id()))
    }

    fn partitioner(&self, href: PartitionerRef) -> Result<&PartitionerState> {
        self.partitioners
            .get(&href.id())
            .ok_or_else(|| unknown_handle("partitioner", href.id()))
    }
}

fn unknown_handle(what: &str, id: HandleId) -> BridgeError {
    BridgeError::InvalidHandle(format!("unknown {what} handle {id}"))
}

impl LocalBridge {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            tables: RwLock::new(Tables::default()),
        }
    }

    fn mint(&self) -> HandleId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn insert_rdd(&self, records: Vec<SpatialRecord>) -> RddRef {
        let id = self.mint();
        self.tables
            .write()
            .rdds
            .insert(id, RddState::new(records));
        RddRef::new(id)
    }

    fn load_typed(
        &self,
        location: &str,
        kind: GeometryKind,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<RddRef> {
        if num_partitions == 0 {
            return Err(BridgeError::Invalid(
                "num_partitions must be at least 1".to_string(),
            ));
        }
        let records = reader::load(location, kind, splitter, offset)?;
        Ok(self.insert_rdd(records))
    }

    fn df_rows_to_records(
        &self,
        href: DfRef,
        geometry_column: GeometryColumn<'_>,
        fields: Option<&[String]>,
    ) -> Result<RddRef> {
        let records = {
            let tables = self.tables.read();
            let df = tables.df(href)?;
            let geometry_index = match geometry_column {
                GeometryColumn::First => 0,
                GeometryColumn::Named(name) => df.schema.index_of(name).map_err(|_| {
                    BridgeError::Invalid(format!("no geometry column named {name:?}"))
                })?,
            };
            if df.schema.fields().is_empty() {
                return Err(BridgeError::Invalid(
                    "cannot build a spatial RDD from a dataframe with no columns".to_string(),
                ));
            }

            let attribute_indices: Vec<usize> = match fields {
                Some(names) => names
                    .iter()
                    .map(|name| {
                        df.schema.index_of(name).map_err(|_| {
                            BridgeError::Invalid(format!("no column named {name:?}"))
                        })
                    })
                    .collect::<Result<_>>()?,
                None => (0..df.schema.fields().len())
                    .filter(|&i| i != geometry_index)
                    .collect(),
            };

            extract_records(&df.batches, geometry_index, &attribute_indices)?
        };
        Ok(self.insert_rdd(records))
    }

    fn join_matches(
        tables: &Tables,
        spatial: RddRef,
        query: RddRef,
        params: &JoinParams,
        preserve_duplicates: bool,
    ) -> Result<Vec<(usize, usize)>> {
        let spatial_state = tables.rdd(spatial)?;
        let query_state = tables.rdd(query)?;

        let spatial_parts = spatial_state.partitions.as_ref().ok_or_else(|| {
            BridgeError::Engine(
                "the object collection is not spatially partitioned".to_string(),
            )
        })?;
        let query_parts = query_state.partitions.as_ref().ok_or_else(|| {
            BridgeError::Engine(
                "the query window collection is not spatially partitioned".to_string(),
            )
        })?;
        if spatial_parts.partitioner_id != query_parts.partitioner_id {
            return Err(BridgeError::Engine(
                "join inputs are partitioned by different partitioners".to_string(),
            ));
        }

        let indexes = if params.use_index {
            Some(spatial_parts.indexes.as_ref().ok_or_else(|| {
                BridgeError::Engine(
                    "indexed join requires an index built on the partitioned collection"
                        .to_string(),
                )
            })?)
        } else {
            None
        };

        let mut preserved: Vec<(usize, usize)> = Vec::new();
        let mut deduplicated: BTreeSet<(usize, usize)> = BTreeSet::new();
        for bucket in 0..query_parts.buckets.len() {
            for &query_index in &query_parts.buckets[bucket] {
                let window = query_state.records[query_index].geometry().as_geo();
                let candidates: Vec<usize> = match indexes {
                    Some(trees) => match &query_state.envelopes[query_index] {
                        Some(envelope) => index::query_candidates(&trees[bucket], envelope),
                        None => continue,
                    },
                    None => spatial_parts.buckets[bucket].clone(),
                };
                for spatial_index in candidates {
                    let object = spatial_state.records[spatial_index].geometry().as_geo();
                    if measures::matches_window(
                        window,
                        object,
                        params.consider_boundary_intersection,
                    ) {
                        if preserve_duplicates {
                            preserved.push((query_index, spatial_index));
                        } else {
                            deduplicated.insert((query_index, spatial_index));
                        }
                    }
                }
            }
        }

        if preserve_duplicates {
            Ok(preserved)
        } else {
            Ok(deduplicated.into_iter().collect())
        }
    }
}

impl Default for LocalBridge {
    fn default() -> Self {
        Self::new()
    }
}

enum GeometryColumn<'a> {
    First,
    Named(&'a str),
}

impl SpatialBridge for LocalBridge {
    fn create_data_frame(&self, batches: Vec<RecordBatch>) -> Result<DfRef> {
        let schema = batches
            .first()
            .map(|b| b.schema())
            .ok_or_else(|| {
                BridgeError::Invalid(
                    "create_data_frame requires at least one record batch".to_string(),
                )
            })?;
        if batches.iter().any(|b| b.schema() != schema) {
            return Err(BridgeError::Invalid(
                "all record batches must share one schema".to_string(),
            ));
        }

        let id = self.mint();
        self.tables
            .write()
            .dfs
            .insert(id, DfState { schema, batches });
        Ok(DfRef::new(id))
    }

    fn data_frame_schema(&self, df: DfRef) -> Result<SchemaRef> {
        Ok(self.tables.read().df(df)?.schema.clone())
    }

    fn collect_data_frame(&self, df: DfRef) -> Result<Vec<RecordBatch>> {
        Ok(self.tables.read().df(df)?.batches.clone())
    }

    fn df_to_rdd(&self, df: DfRef) -> Result<RddRef> {
        // A distributed engine would hand back untyped rows here; in one
        // process the row and spatial record forms coincide.
        self.df_rows_to_records(df, GeometryColumn::First, None)
    }

    fn df_to_spatial_rdd(&self, df: DfRef) -> Result<RddRef> {
        self.df_rows_to_records(df, GeometryColumn::First, None)
    }

    fn df_to_spatial_rdd_with_geometry_field(
        &self,
        df: DfRef,
        geometry_field: &str,
    ) -> Result<RddRef> {
        self.df_rows_to_records(df, GeometryColumn::Named(geometry_field), None)
    }

    fn df_to_spatial_rdd_with_fields(&self, df: DfRef, field_names: &[String]) -> Result<RddRef> {
        self.df_rows_to_records(df, GeometryColumn::First, Some(field_names))
    }

    fn rdd_to_df(&self, rdd: RddRef, field_names: Option<&[String]>) -> Result<DfRef> {
        let batch = {
            let tables = self.tables.read();
            let state = tables.rdd(rdd)?;
            records_to_batch(&state.records, field_names)?
        };
        self.create_data_frame(vec![batch])
    }

    fn create_point_rdd(
        &self,
        location: &str,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<RddRef> {
        self.load_typed(location, GeometryKind::Point, splitter, offset, num_partitions)
    }

    fn create_rectangle_rdd(
        &self,
        location: &str,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<RddRef> {
        self.load_typed(
            location,
            GeometryKind::Rectangle,
            splitter,
            offset,
            num_partitions,
        )
    }

    fn create_polygon_rdd(
        &self,
        location: &str,
        splitter: FileSplitter,
        offset: usize,
        num_partitions: usize,
    ) -> Result<RddRef> {
        self.load_typed(
            location,
            GeometryKind::Polygon,
            splitter,
            offset,
            num_partitions,
        )
    }

    fn analyze(&self, rdd: RddRef) -> Result<RddStats> {
        let tables = self.tables.read();
        let state = tables.rdd(rdd)?;
        let boundary = state
            .envelopes
            .iter()
            .flatten()
            .fold(None::<Envelope>, |acc, env| {
                Some(match acc {
                    Some(merged) => merged.merge(env),
                    None => *env,
                })
            });
        Ok(RddStats {
            count: state.records.len(),
            boundary,
        })
    }

    fn spatial_partitioning(
        &self,
        rdd: RddRef,
        grid_type: GridType,
        num_partitions: usize,
    ) -> Result<PartitionerRef> {
        let boundary = self.analyze(rdd)?.boundary.ok_or_else(|| {
            BridgeError::Invalid("cannot spatially partition an empty collection".to_string())
        })?;
        // Every grid type shares the uniform grid; the requested type is
        // kept as partitioner metadata.
        let grid = UniformGrid::build(&boundary, num_partitions);
        log::debug!("partitioning {grid_type} collection into {num_partitions} cells");

        let partitioner_id = self.mint();
        let mut tables = self.tables.write();
        let buckets = assign_buckets(&grid, tables.rdd(rdd)?);
        tables.partitioners.insert(
            partitioner_id,
            PartitionerState { grid, grid_type },
        );
        tables.rdd_mut(rdd)?.partitions = Some(PartitionState {
            partitioner_id,
            buckets,
            indexes: None,
        });
        Ok(PartitionerRef::new(partitioner_id))
    }

    fn spatial_partitioning_with(&self, rdd: RddRef, partitioner: PartitionerRef) -> Result<()> {
        let mut tables = self.tables.write();
        let partitioner_state = tables.partitioner(partitioner)?;
        log::debug!(
            "re-partitioning with an existing {} partitioner",
            partitioner_state.grid_type
        );
        let grid = partitioner_state.grid.clone();
        let buckets = assign_buckets(&grid, tables.rdd(rdd)?);
        tables.rdd_mut(rdd)?.partitions = Some(PartitionState {
            partitioner_id: partitioner.id(),
            buckets,
            indexes: None,
        });
        Ok(())
    }

    fn build_index(
        &self,
        rdd: RddRef,
        index_type: IndexType,
        build_on_spatial_partitioned_rdd: bool,
    ) -> Result<()> {
        log::debug!("building {index_type} index (partitioned: {build_on_spatial_partitioned_rdd})");
        let mut tables = self.tables.write();
        let RddState {
            envelopes,
            partitions,
            raw_index,
            ..
        } = tables.rdd_mut(rdd)?;
        if build_on_spatial_partitioned_rdd {
            let partitions = partitions.as_mut().ok_or_else(|| {
                BridgeError::Engine(
                    "build_index on a partitioned collection requires spatial_partitioning first"
                        .to_string(),
                )
            })?;
            let trees = partitions
                .buckets
                .iter()
                .map(|bucket| {
                    index::build_rtree(
                        bucket
                            .iter()
                            .map(|&record_index| (record_index, &envelopes[record_index])),
                    )
                })
                .collect();
            partitions.indexes = Some(trees);
        } else {
            *raw_index = Some(index::build_rtree(envelopes.iter().enumerate()));
        }
        Ok(())
    }

    fn spatial_join(
        &self,
        spatial: RddRef,
        query: RddRef,
        params: &JoinParams,
    ) -> Result<PairRef> {
        let id = self.mint();
        let mut tables = self.tables.write();
        let matches =
            Self::join_matches(&tables, spatial, query, params, params.preserve_duplicates)?;
        let pairs: Vec<(SpatialRecord, SpatialRecord)> = {
            let spatial_state = tables.rdd(spatial)?;
            let query_state = tables.rdd(query)?;
            matches
                .into_iter()
                .map(|(query_index, spatial_index)| {
                    (
                        query_state.records[query_index].clone(),
                        spatial_state.records[spatial_index].clone(),
                    )
                })
                .collect()
        };
        log::debug!("spatial join produced {} pairs", pairs.len());
        tables.pairs.insert(id, pairs);
        Ok(PairRef::new(id))
    }

    fn spatial_join_grouped(
        &self,
        spatial: RddRef,
        query: RddRef,
        params: &JoinParams,
    ) -> Result<GroupedRef> {
        let id = self.mint();
        let mut tables = self.tables.write();
        // Grouped results are always deduplicated
        let matches = Self::join_matches(&tables, spatial, query, params, false)?;
        let grouped: Vec<(SpatialRecord, Vec<SpatialRecord>)> = {
            let spatial_state = tables.rdd(spatial)?;
            let query_state = tables.rdd(query)?;
            let mut by_window: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
            for (query_index, spatial_index) in matches {
                by_window.entry(query_index).or_default().push(spatial_index);
            }
            by_window
                .into_iter()
                .map(|(query_index, spatial_indices)| {
                    (
                        query_state.records[query_index].clone(),
                        spatial_indices
                            .into_iter()
                            .map(|i| spatial_state.records[i].clone())
                            .collect(),
                    )
                })
                .collect()
        };
        tables.grouped.insert(id, grouped);
        Ok(GroupedRef::new(id))
    }

    fn knn(
        &self,
        rdd: RddRef,
        center: &Geometry,
        k: usize,
        use_index: bool,
    ) -> Result<Vec<SpatialRecord>> {
        let tables = self.tables.read();
        let state = tables.rdd(rdd)?;

        let mut best: Vec<(f64, usize)> = Vec::new();
        let consider = |best: &mut Vec<(f64, usize)>, record_index: usize| {
            let d = measures::distance(
                center.as_geo(),
                state.records[record_index].geometry().as_geo(),
            );
            best.push((d, record_index));
            best.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            best.truncate(k);
        };

        if use_index {
            let tree = state.raw_index.as_ref().ok_or_else(|| {
                BridgeError::Engine(
                    "indexed knn requires an index built on the raw collection".to_string(),
                )
            })?;
            // The envelope bound is only a usable lower bound when the
            // centre is a point, so pruning is limited to that case.
            let (probe, prune) = match center.as_geo() {
                GeoGeometry::Point(p) => ([p.x(), p.y()], true),
                _ => ([0.0, 0.0], false),
            };
            for (entry, envelope_d2) in tree.nearest_neighbor_iter_with_distance_2(&probe) {
                if prune && best.len() == k {
                    let worst = best[k - 1].0;
                    if envelope_d2 > worst * worst {
                        break;
                    }
                }
                consider(&mut best, entry.record_index);
            }
        } else {
            // Records without an envelope are empty geometries; the index
            // never holds them, so the scan skips them for the same answer
            for record_index in 0..state.records.len() {
                if state.envelopes[record_index].is_none() {
                    continue;
                }
                consider(&mut best, record_index);
            }
        }

        Ok(best
            .into_iter()
            .map(|(_, record_index)| state.records[record_index].clone())
            .collect())
    }

    fn collect_rdd(&self, rdd: RddRef) -> Result<Vec<SpatialRecord>> {
        Ok(self.tables.read().rdd(rdd)?.records.clone())
    }

    fn collect_pairs(&self, pairs: PairRef) -> Result<Vec<(SpatialRecord, SpatialRecord)>> {
        self.tables
            .read()
            .pairs
            .get(&pairs.id())
            .cloned()
            .ok_or_else(|| unknown_handle("pair RDD", pairs.id()))
    }

    fn collect_grouped(
        &self,
        grouped: GroupedRef,
    ) -> Result<Vec<(SpatialRecord, Vec<SpatialRecord>)>> {
        self.tables
            .read()
            .grouped
            .get(&grouped.id())
            .cloned()
            .ok_or_else(|| unknown_handle("grouped result", grouped.id()))
    }

    fn release(&self, handle: AnyRef) -> Result<()> {
        let mut tables = self.tables.write();
        let released = match handle {
            AnyRef::Df(href) => tables.dfs.remove(&href.id()).is_some(),
            AnyRef::Rdd(href) => tables.rdds.remove(&href.id()).is_some(),
            AnyRef::Pair(href) => tables.pairs.remove(&href.id()).is_some(),
            AnyRef::Grouped(href) => tables.grouped.remove(&href.id()).is_some(),
            AnyRef::Partitioner(href) => tables.partitioners.remove(&href.id()).is_some(),
        };
        if released {
            Ok(())
        } else {
            Err(BridgeError::InvalidHandle(format!(
                "cannot release unknown handle {handle:?}"
            )))
        }
    }
}

fn assign_buckets(grid: &UniformGrid, state: &RddState) -> Vec<Vec<usize>> {
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); grid.num_buckets()];
    for (record_index, envelope) in state.envelopes.iter().enumerate() {
        for bucket in grid.buckets_for(envelope.as_ref()) {
            buckets[bucket].push(record_index);
        }
    }
    buckets
}

/// Pull rows out of Arrow batches into spatial records
///
/// The geometry column is read as WKT text; attribute values are rendered
/// with the Arrow display rules and tab-joined.
fn extract_records(
    batches: &[RecordBatch],
    geometry_index: usize,
    attribute_indices: &[usize],
) -> Result<Vec<SpatialRecord>> {
    let mut records = Vec::new();
    for batch in batches {
        let geometry_column = batch.column(geometry_index);
        for row in 0..batch.num_rows() {
            let wkt = array_value_to_string(geometry_column, row)
                .map_err(|e| BridgeError::External(Box::new(e)))?;
            let geometry = Geometry::from_wkt(&wkt)
                .map_err(|e| BridgeError::Invalid(format!("row {}: {e}", records.len() + 1)))?;

            let mut attributes = Vec::with_capacity(attribute_indices.len());
            for &column in attribute_indices {
                let value = array_value_to_string(batch.column(column), row)
                    .map_err(|e| BridgeError::External(Box::new(e)))?;
                attributes.push(value);
            }
            let user_data = attributes.join(&USER_DATA_DELIMITER.to_string());
            records.push(SpatialRecord::new(geometry, user_data));
        }
    }
    Ok(records)
}

/// Rebuild an Arrow batch from spatial records
///
/// Column layout is the geometry as WKT followed by the attribute fields,
/// named positionally (`_c1`, `_c2`, ...) unless names are given.
fn records_to_batch(
    records: &[SpatialRecord],
    field_names: Option<&[String]>,
) -> Result<RecordBatch> {
    let arity = match field_names {
        Some(names) => {
            if let Some(first) = records.first() {
                let actual = first.user_fields().len();
                if names.len() != actual {
                    return Err(BridgeError::ColumnMismatch {
                        expected: names.len(),
                        actual,
                    });
                }
            }
            names.len()
        }
        None => records
            .first()
            .map(|record| record.user_fields().len())
            .ok_or_else(|| {
                BridgeError::Invalid(
                    "cannot infer a schema from an empty collection".to_string(),
                )
            })?,
    };

    let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(records.len()); 1 + arity];
    for record in records {
        let fields = record.user_fields();
        if fields.len() != arity {
            return Err(BridgeError::UserData {
                expected: arity,
                actual: fields.len(),
            });
        }
        columns[0].push(record.geometry().to_wkt());
        for (slot, value) in fields.into_iter().enumerate() {
            columns[1 + slot].push(value.to_string());
        }
    }

    let mut schema_fields = Vec::with_capacity(1 + arity);
    schema_fields.push(Field::new("geometry", DataType::Utf8, false));
    match field_names {
        Some(names) => {
            schema_fields.extend(names.iter().map(|n| Field::new(n, DataType::Utf8, false)));
        }
        None => schema_fields.extend(
            (1..=arity).map(|i| Field::new(format!("_c{i}"), DataType::Utf8, false)),
        ),
    }

    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|values| Arc::new(StringArray::from(values)) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(schema_fields)), arrays)
        .map_err(|e| BridgeError::External(Box::new(e)))
}
