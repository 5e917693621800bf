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

//! Geometry values as they appear at the adapter boundary
//!
//! The client layer never computes with geometries; it only moves them
//! around. [Geometry] is therefore a thin value wrapper whose public surface
//! is limited to WKT ingress/egress and a few passthrough accessors, while
//! [Envelope] carries the axis-aligned bounds the engines exchange for
//! statistics and partition metadata.

pub mod envelope;
pub mod geometry;

pub use envelope::Envelope;
pub use geometry::Geometry;
