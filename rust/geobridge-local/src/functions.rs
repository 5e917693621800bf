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

//! Spatial SQL function surface of the local engine
//!
//! Null propagation is uniform: a `None` geometry yields `Ok(None)`.
//! `st_buffer` and cross-CRS `st_transform` are deliberately unimplemented
//! and fail with `Unsupported`.
use geo::{Area, Centroid, CoordsIter, MapCoords};
use geo_types::{Coord, Geometry as GeoGeometry};

use geobridge::functions::SpatialFunctions;
use geobridge_common::{BridgeError, Result};
use geobridge_geometry::Geometry;

use crate::engine::LocalBridge;
use crate::measures;

impl SpatialFunctions for LocalBridge {
    fn st_geom_from_wkt(&self, wkt: Option<&str>) -> Result<Option<Geometry>> {
        wkt.map(Geometry::from_wkt).transpose()
    }

    fn st_as_text(&self, geom: Option<&Geometry>) -> Result<Option<String>> {
        Ok(geom.map(Geometry::to_wkt))
    }

    fn st_convex_hull(&self, geom: Option<&Geometry>) -> Result<Option<Geometry>> {
        Ok(geom.map(|g| Geometry::from(measures::convex_hull(g.as_geo()))))
    }

    fn st_buffer(&self, geom: Option<&Geometry>, _distance: f64) -> Result<Option<Geometry>> {
        if geom.is_none() {
            return Ok(None);
        }
        Err(BridgeError::Unsupported(
            "st_buffer is not implemented by the local engine".to_string(),
        ))
    }

    fn st_envelope(&self, geom: Option<&Geometry>) -> Result<Option<Geometry>> {
        Ok(geom.map(|g| match g.envelope() {
            Some(envelope) => Geometry::from(GeoGeometry::Polygon(envelope.to_polygon())),
            // Empty geometries have no bounds to widen
            None => g.clone(),
        }))
    }

    fn st_centroid(&self, geom: Option<&Geometry>) -> Result<Option<Geometry>> {
        Ok(geom
            .and_then(|g| g.as_geo().centroid())
            .map(|point| Geometry::from(GeoGeometry::Point(point))))
    }

    fn st_area(&self, geom: Option<&Geometry>) -> Result<Option<f64>> {
        Ok(geom.map(|g| g.as_geo().unsigned_area()))
    }

    fn st_length(&self, geom: Option<&Geometry>) -> Result<Option<f64>> {
        Ok(geom.map(|g| measures::length(g.as_geo())))
    }

    fn st_distance(&self, a: Option<&Geometry>, b: Option<&Geometry>) -> Result<Option<f64>> {
        match (a, b) {
            (Some(a), Some(b)) => Ok(Some(measures::distance(a.as_geo(), b.as_geo()))),
            _ => Ok(None),
        }
    }

    fn st_intersection(
        &self,
        a: Option<&Geometry>,
        b: Option<&Geometry>,
    ) -> Result<Option<Geometry>> {
        match (a, b) {
            (Some(a), Some(b)) => {
                let result = measures::intersection(a.as_geo(), b.as_geo())?;
                Ok(Some(Geometry::from(result)))
            }
            _ => Ok(None),
        }
    }

    fn st_is_valid(&self, geom: Option<&Geometry>) -> Result<Option<bool>> {
        Ok(geom.map(|g| measures::is_valid(g.as_geo())))
    }

    fn st_precision_reduce(
        &self,
        geom: Option<&Geometry>,
        precision: u32,
    ) -> Result<Option<Geometry>> {
        Ok(geom.map(|g| Geometry::from(measures::precision_reduce(g.as_geo(), precision))))
    }

    fn st_transform(
        &self,
        geom: Option<&Geometry>,
        src_crs: &str,
        dst_crs: &str,
        _lenient: bool,
        swap_xy: bool,
    ) -> Result<Option<Geometry>> {
        let Some(geom) = geom else {
            return Ok(None);
        };
        if !src_crs.trim().eq_ignore_ascii_case(dst_crs.trim()) {
            return Err(BridgeError::Unsupported(format!(
                "st_transform from {src_crs} to {dst_crs} is not implemented by the local engine"
            )));
        }
        let transformed = if swap_xy {
            geom.as_geo()
                .clone()
                .map_coords(|Coord { x, y }| Coord { x: y, y: x })
        } else {
            geom.as_geo().clone()
        };
        Ok(Some(Geometry::from(transformed)))
    }

    fn st_n_points(&self, geom: Option<&Geometry>) -> Result<Option<usize>> {
        Ok(geom.map(|g| g.as_geo().coords_count()))
    }

    fn st_geometry_type(&self, geom: Option<&Geometry>) -> Result<Option<String>> {
        Ok(geom.map(|g| format!("ST_{}", g.geometry_type())))
    }
}
