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

//! Typed client boundary for a distributed spatial engine
//!
//! Every spatial computation (indexing, partitioning, predicate evaluation,
//! join execution) happens behind the [bridge::SpatialBridge] trait; this
//! crate only marshals requests and results. The public surface mirrors the
//! engine's adapter contract:
//!
//! - [context::SpatialContext] owns the bridge connection and creates
//!   dataframes and typed spatial RDDs,
//! - [adapter::Adapter] converts between dataframes and spatial RDDs,
//!   including the pair-flattening conversion for join outputs,
//! - [join::JoinQuery] and [knn::KnnQuery] issue join and K nearest
//!   neighbour requests,
//! - the handle types ([dataframe::DataFrame], [rdd::SpatialRdd] and
//!   friends) own their remote objects and release them on drop.

pub mod adapter;
pub mod bridge;
pub mod context;
pub mod dataframe;
pub mod functions;
pub mod join;
pub mod knn;
pub mod rdd;
pub mod record;

pub use adapter::Adapter;
pub use context::SpatialContext;
pub use dataframe::DataFrame;
pub use join::{JoinParams, JoinQuery};
pub use knn::KnnQuery;
pub use rdd::{GroupedResultRdd, SpatialPairRdd, SpatialPartitioner, SpatialRdd};
pub use record::SpatialRecord;
