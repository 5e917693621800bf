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
use std::io;

use thiserror::Error;

/// Error type shared by the adapter layer and the engines behind it
///
/// The client layer performs no recovery or translation of engine failures:
/// anything raised behind the bridge surfaces here unmodified as
/// [BridgeError::Engine] or [BridgeError::Unsupported]. The remaining
/// variants are the explicit local failure modes of the adapter itself.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A locally validated argument was rejected before reaching the engine
    #[error("{0}")]
    Invalid(String),
    /// A combined column-name list does not match the produced column count
    #[error("column length does not match: expected {expected} names for {actual} columns")]
    ColumnMismatch { expected: usize, actual: usize },
    /// Tab-delimited user data did not split into the expected number of fields
    #[error("malformed user data: record splits into {actual} fields where {expected} were expected")]
    UserData { expected: usize, actual: usize },
    /// The engine does not implement the requested operation
    #[error("operation not supported by the engine: {0}")]
    Unsupported(String),
    /// A handle referring to a released or foreign remote object was used
    #[error("invalid handle: {0}")]
    InvalidHandle(String),
    /// A failure raised by the engine, passed through untranslated
    #[error("{0}")]
    Engine(String),
    #[error("{0}")]
    IO(#[from] io::Error),
    #[error("{0}")]
    External(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
