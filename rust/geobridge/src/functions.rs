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
use geobridge_common::Result;
use geobridge_geometry::Geometry;

/// Typed rendition of the engine's spatial SQL function surface
///
/// Each method corresponds to one `ST_*` function; the argument order and
/// meaning follow the wrapped engine exactly (this is a compatibility
/// contract, notably `st_transform(geom, src_crs, dst_crs, lenient,
/// swap_xy)`). SQL null propagation is expressed through `Option`: a `None`
/// input yields `Ok(None)` rather than an error.
///
/// Engines are free to leave functions unimplemented; such calls fail with
/// an `Unsupported` error which the client layer passes through unchanged.
pub trait SpatialFunctions {
    fn st_geom_from_wkt(&self, wkt: Option<&str>) -> Result<Option<Geometry>>;

    fn st_as_text(&self, geom: Option<&Geometry>) -> Result<Option<String>>;

    fn st_convex_hull(&self, geom: Option<&Geometry>) -> Result<Option<Geometry>>;

    fn st_buffer(&self, geom: Option<&Geometry>, distance: f64) -> Result<Option<Geometry>>;

    fn st_envelope(&self, geom: Option<&Geometry>) -> Result<Option<Geometry>>;

    fn st_centroid(&self, geom: Option<&Geometry>) -> Result<Option<Geometry>>;

    fn st_area(&self, geom: Option<&Geometry>) -> Result<Option<f64>>;

    fn st_length(&self, geom: Option<&Geometry>) -> Result<Option<f64>>;

    fn st_distance(&self, a: Option<&Geometry>, b: Option<&Geometry>) -> Result<Option<f64>>;

    fn st_intersection(
        &self,
        a: Option<&Geometry>,
        b: Option<&Geometry>,
    ) -> Result<Option<Geometry>>;

    fn st_is_valid(&self, geom: Option<&Geometry>) -> Result<Option<bool>>;

    /// Round every coordinate to `precision` decimal digits
    fn st_precision_reduce(
        &self,
        geom: Option<&Geometry>,
        precision: u32,
    ) -> Result<Option<Geometry>>;

    /// Reproject between coordinate reference systems
    ///
    /// `lenient` permits approximate datum conversion and `swap_xy` swaps
    /// coordinate order before transforming, matching the engine convention.
    fn st_transform(
        &self,
        geom: Option<&Geometry>,
        src_crs: &str,
        dst_crs: &str,
        lenient: bool,
        swap_xy: bool,
    ) -> Result<Option<Geometry>>;

    fn st_n_points(&self, geom: Option<&Geometry>) -> Result<Option<usize>>;

    /// The `ST_`-prefixed geometry type name (e.g. `ST_LineString`)
    fn st_geometry_type(&self, geom: Option<&Geometry>) -> Result<Option<String>>;
}
