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
use std::fmt;
use std::sync::Arc;

use arrow_array::RecordBatch;
use arrow_schema::SchemaRef;
use geobridge_common::{BridgeError, Result};

use crate::bridge::{AnyRef, DfRef, SpatialBridge};

/// Handle to a remote dataframe
///
/// The data lives in the engine; `schema` and `collect` are remote calls.
pub struct DataFrame {
    bridge: Arc<dyn SpatialBridge>,
    href: DfRef,
    released: bool,
}

impl DataFrame {
    pub(crate) fn new(bridge: Arc<dyn SpatialBridge>, href: DfRef) -> Self {
        Self {
            bridge,
            href,
            released: false,
        }
    }

    pub(crate) fn bridge(&self) -> &Arc<dyn SpatialBridge> {
        &self.bridge
    }

    pub(crate) fn href(&self) -> Result<DfRef> {
        if self.released {
            Err(BridgeError::InvalidHandle(
                "dataframe handle was already released".to_string(),
            ))
        } else {
            Ok(self.href)
        }
    }

    pub fn schema(&self) -> Result<SchemaRef> {
        self.bridge.data_frame_schema(self.href()?)
    }

    /// Materialize the full remote dataframe locally
    pub fn collect(&self) -> Result<Vec<RecordBatch>> {
        self.bridge.collect_data_frame(self.href()?)
    }

    /// Release the remote dataframe
    pub fn release(mut self) -> Result<()> {
        let href = self.href()?;
        self.released = true;
        self.bridge.release(AnyRef::Df(href))
    }
}

// The bridge field is a trait object, so Debug is written out by hand
impl fmt::Debug for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFrame")
            .field("href", &self.href)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl Drop for DataFrame {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.bridge.release(AnyRef::Df(self.href)) {
                log::debug!("failed to release dataframe handle: {e}");
            }
        }
    }
}
