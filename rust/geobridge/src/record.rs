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
use geobridge_geometry::Geometry;

/// Delimiter joining attribute fields into a record's user-data string
///
/// Records carry their non-geometry attributes tab-joined; the pair
/// flattening conversion splits on the same delimiter. Attribute values
/// containing a literal tab therefore change the field count, which the
/// adapter reports as an explicit error rather than misparsing silently.
pub const USER_DATA_DELIMITER: char = '\t';

/// One geometry-plus-attributes record of a spatial collection
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialRecord {
    geometry: Geometry,
    user_data: String,
}

impl SpatialRecord {
    pub fn new(geometry: Geometry, user_data: impl Into<String>) -> Self {
        Self {
            geometry,
            user_data: user_data.into(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn user_data(&self) -> &str {
        &self.user_data
    }

    /// The user data split back into attribute fields
    ///
    /// An empty user-data string means zero fields, not one empty field.
    pub fn user_fields(&self) -> Vec<&str> {
        if self.user_data.is_empty() {
            vec![]
        } else {
            self.user_data.split(USER_DATA_DELIMITER).collect()
        }
    }
}
