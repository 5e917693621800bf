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

//! In-process reference engine for the geobridge boundary contract
//!
//! [LocalBridge] implements every remote operation of the boundary in a
//! single process, so the client layer can be exercised end to end without
//! a cluster. It invents no spatial algorithms of its own: predicates and
//! measures delegate to the georust crates, indexes are `rstar` R-trees,
//! and spatial partitioning is a uniform grid over the collection boundary.
//! All grid types share the grid implementation; the requested type is kept
//! as partitioner metadata only.

mod engine;
mod functions;
mod index;
mod measures;
mod partition;
mod reader;

pub use engine::LocalBridge;
