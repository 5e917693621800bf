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
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Spatial partitioning strategy used to distribute a collection across workers
///
/// The grid type is a hint to the engine; which structure is actually built is
/// engine-specific. All variants are forwarded verbatim across the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridType {
    /// Partition boundaries derived from an R-tree over a sample of the input
    RTree,
    /// Quad-tree partitioning
    QuadTree,
    /// KDB-tree partitioning
    KdbTree,
}

impl GridType {
    fn name(&self) -> &'static str {
        match self {
            Self::RTree => "rtree",
            Self::QuadTree => "quadtree",
            Self::KdbTree => "kdbtree",
        }
    }
}

impl Display for GridType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GridType {
    type Err = BridgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "rtree" => Ok(Self::RTree),
            "quadtree" => Ok(Self::QuadTree),
            "kdbtree" => Ok(Self::KdbTree),
            _ => Err(BridgeError::Invalid(format!(
                "Unknown grid type: {value}. Expected: rtree, quadtree, kdbtree"
            ))),
        }
    }
}

/// The per-partition index structure built to accelerate joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    RTree,
    QuadTree,
}

impl IndexType {
    fn name(&self) -> &'static str {
        match self {
            Self::RTree => "rtree",
            Self::QuadTree => "quadtree",
        }
    }
}

impl Display for IndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexType {
    type Err = BridgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "rtree" => Ok(Self::RTree),
            "quadtree" => Ok(Self::QuadTree),
            _ => Err(BridgeError::Invalid(format!(
                "Unknown index type: {value}. Expected: rtree, quadtree"
            ))),
        }
    }
}

/// Declared format of a delimited text fixture
///
/// `Csv` and `Tsv` carry numeric coordinates in the leading fields; `Wkt` and
/// `Wkb` carry a serialized geometry in the field selected by the caller's
/// offset. Fields not consumed by the geometry become the record's user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileSplitter {
    Csv,
    Tsv,
    Wkt,
    Wkb,
}

impl FileSplitter {
    /// The field delimiter implied by this splitter
    pub fn delimiter(&self) -> char {
        match self {
            Self::Csv => ',',
            Self::Tsv | Self::Wkt | Self::Wkb => '\t',
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Wkt => "wkt",
            Self::Wkb => "wkb",
        }
    }
}

impl Display for FileSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileSplitter {
    type Err = BridgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "wkt" => Ok(Self::Wkt),
            "wkb" => Ok(Self::Wkb),
            _ => Err(BridgeError::Invalid(format!(
                "Unknown file splitter: {value}. Expected: csv, tsv, wkt, wkb"
            ))),
        }
    }
}

/// Which join input the accelerating index is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinBuildSide {
    Left,
    Right,
}

impl JoinBuildSide {
    fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl Display for JoinBuildSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for JoinBuildSide {
    type Err = BridgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(BridgeError::Invalid(format!(
                "Unknown join build side: {value}. Expected: left, right"
            ))),
        }
    }
}
