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
use geo::BoundingRect;
use geo_types::Geometry as GeoGeometry;
use wkt::{ToWkt, TryFromWkt};

use geobridge_common::{BridgeError, Result};

use crate::envelope::Envelope;

/// Opaque geometry value exchanged across the bridge
///
/// Geometry values are produced and consumed by the engines; the adapter
/// layer treats them as WKT-representable blobs. The underlying
/// [geo_types::Geometry] is exposed for engine implementations but the
/// client-side operations never inspect it.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    inner: GeoGeometry<f64>,
}

impl Geometry {
    /// Parse a geometry from its WKT representation
    pub fn from_wkt(text: &str) -> Result<Self> {
        let inner = GeoGeometry::try_from_wkt_str(text)
            .map_err(|e| BridgeError::Invalid(format!("malformed WKT: {e}")))?;
        Ok(Self { inner })
    }

    /// Serialize to WKT
    pub fn to_wkt(&self) -> String {
        self.inner.wkt_string()
    }

    /// The geometry type name as used by WKT (e.g. `Point`, `LineString`)
    pub fn geometry_type(&self) -> &'static str {
        match &self.inner {
            GeoGeometry::Point(_) => "Point",
            GeoGeometry::Line(_) => "Line",
            GeoGeometry::LineString(_) => "LineString",
            GeoGeometry::Polygon(_) => "Polygon",
            GeoGeometry::MultiPoint(_) => "MultiPoint",
            GeoGeometry::MultiLineString(_) => "MultiLineString",
            GeoGeometry::MultiPolygon(_) => "MultiPolygon",
            GeoGeometry::GeometryCollection(_) => "GeometryCollection",
            GeoGeometry::Rect(_) => "Rect",
            GeoGeometry::Triangle(_) => "Triangle",
        }
    }

    /// Axis-aligned bounds, or `None` for empty geometries
    pub fn envelope(&self) -> Option<Envelope> {
        self.inner.bounding_rect().map(Envelope::from)
    }

    /// Engine-side access to the underlying value
    pub fn as_geo(&self) -> &GeoGeometry<f64> {
        &self.inner
    }

    pub fn into_geo(self) -> GeoGeometry<f64> {
        self.inner
    }
}

impl From<GeoGeometry<f64>> for Geometry {
    fn from(inner: GeoGeometry<f64>) -> Self {
        Self { inner }
    }
}
