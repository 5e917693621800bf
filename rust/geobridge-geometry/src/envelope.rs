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
use geo_types::{coord, LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};

use geobridge_common::{BridgeError, Result};

/// Axis-aligned bounding box with closed bounds
///
/// The constructor argument order (`min_x, max_x, min_y, max_y`) follows the
/// envelope convention of the wrapped engine. Intervals are closed: two
/// envelopes sharing only an edge or a corner still intersect.
///
/// This structure implements Serialize and Deserialize so it can be passed
/// between engine components that exchange partition metadata as data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Envelope {
    /// Create an envelope, rejecting inverted or non-finite bounds
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self> {
        if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
            return Err(BridgeError::Invalid(
                "envelope bounds must be finite".to_string(),
            ));
        }
        if min_x > max_x || min_y > max_y {
            return Err(BridgeError::Invalid(format!(
                "inverted envelope bounds: x [{min_x}, {max_x}], y [{min_y}, {max_y}]"
            )));
        }

        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when the closed intervals of both axes overlap
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// True when `other` lies entirely within this envelope (bounds included)
    pub fn contains(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }

    /// The smallest envelope covering both inputs
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grow the envelope by `distance` on every side
    pub fn expand_by(&self, distance: f64) -> Self {
        Self {
            min_x: self.min_x - distance,
            max_x: self.max_x + distance,
            min_y: self.min_y - distance,
            max_y: self.max_y + distance,
        }
    }

    /// Squared euclidean distance from a point to this envelope (zero inside)
    pub fn distance_sq_to_point(&self, x: f64, y: f64) -> f64 {
        let dx = (self.min_x - x).max(0.0).max(x - self.max_x);
        let dy = (self.min_y - y).max(0.0).max(y - self.max_y);
        dx * dx + dy * dy
    }

    /// Render as a closed counter-clockwise rectangle polygon
    pub fn to_polygon(&self) -> Polygon<f64> {
        let ring = LineString::new(vec![
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
            coord! { x: self.min_x, y: self.max_y },
            coord! { x: self.min_x, y: self.min_y },
        ]);
        Polygon::new(ring, vec![])
    }
}

impl From<Rect<f64>> for Envelope {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_x: rect.min().x,
            max_x: rect.max().x,
            min_y: rect.min().y,
            max_y: rect.max().y,
        }
    }
}
