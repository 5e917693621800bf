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

//! Spatial function surface exercised through the boundary trait object
use std::sync::Arc;

use geobridge::bridge::SpatialBridge;
use geobridge::functions::SpatialFunctions;
use geobridge_common::BridgeError;
use geobridge_geometry::Geometry;
use geobridge_local::LocalBridge;
use geobridge_testing::{assert_geometry_eq, assert_wkt_eq};

fn bridge() -> Arc<dyn SpatialBridge> {
    Arc::new(LocalBridge::new())
}

fn geom(wkt: &str) -> Geometry {
    Geometry::from_wkt(wkt).unwrap()
}

#[test]
fn wkt_round_trip_is_identity() {
    let bridge = bridge();
    let source = "POLYGON((0 0,4 0,4 4,0 4,0 0))";

    let parsed = bridge.st_geom_from_wkt(Some(source)).unwrap().unwrap();
    let text = bridge.st_as_text(Some(&parsed)).unwrap().unwrap();
    let reparsed = bridge.st_geom_from_wkt(Some(&text)).unwrap().unwrap();
    assert_geometry_eq(&reparsed, &parsed);

    assert_eq!(bridge.st_geom_from_wkt(None).unwrap(), None);
    assert!(matches!(
        bridge.st_geom_from_wkt(Some("POLYGON((")).unwrap_err(),
        BridgeError::Invalid(_)
    ));
}

#[test]
fn validity_is_tri_state() {
    let bridge = bridge();
    let simple = geom("POLYGON((0 0,4 0,4 4,0 4,0 0))");
    let bowtie = geom("POLYGON((0 0,4 4,4 0,0 4,0 0))");
    let escaped_hole = geom("POLYGON((0 0,4 0,4 4,0 4,0 0),(6 6,7 6,7 7,6 7,6 6))");

    assert_eq!(bridge.st_is_valid(Some(&simple)).unwrap(), Some(true));
    assert_eq!(bridge.st_is_valid(Some(&bowtie)).unwrap(), Some(false));
    assert_eq!(bridge.st_is_valid(Some(&escaped_hole)).unwrap(), Some(false));
    assert_eq!(bridge.st_is_valid(None).unwrap(), None);
}

#[test]
fn precision_reduce_rounds_to_requested_digits() {
    let bridge = bridge();
    let noisy = geom("POINT(0.12345678901234 0.10000000000001)");

    let reduced = bridge.st_precision_reduce(Some(&noisy), 8).unwrap().unwrap();
    assert_wkt_eq(&reduced, "POINT(0.12345679 0.1)");

    let wider = bridge.st_precision_reduce(Some(&noisy), 11).unwrap().unwrap();
    assert_wkt_eq(&wider, "POINT(0.12345678901 0.1)");
}

#[test]
fn hull_envelope_and_centroid() {
    let bridge = bridge();
    let line = geom("LINESTRING(0 0,4 0,4 4)");

    let hull = bridge.st_convex_hull(Some(&line)).unwrap().unwrap();
    assert_eq!(hull.geometry_type(), "Polygon");

    let envelope = bridge.st_envelope(Some(&line)).unwrap().unwrap();
    assert_wkt_eq(&envelope, "POLYGON((0 0,4 0,4 4,0 4,0 0))");

    let centroid = bridge
        .st_centroid(Some(&geom("POLYGON((0 0,2 0,2 2,0 2,0 0))")))
        .unwrap()
        .unwrap();
    assert_wkt_eq(&centroid, "POINT(1 1)");
}

#[test]
fn measures_on_simple_shapes() {
    let bridge = bridge();
    let square = geom("POLYGON((0 0,4 0,4 4,0 4,0 0))");

    assert_eq!(bridge.st_area(Some(&square)).unwrap(), Some(16.0));
    assert_eq!(bridge.st_length(Some(&square)).unwrap(), Some(16.0));
    assert_eq!(bridge.st_n_points(Some(&square)).unwrap(), Some(5));
    assert_eq!(
        bridge.st_geometry_type(Some(&square)).unwrap(),
        Some("ST_Polygon".to_string())
    );

    let d = bridge
        .st_distance(Some(&geom("POINT(7 4)")), Some(&square))
        .unwrap()
        .unwrap();
    assert_eq!(d, 3.0);
}

#[test]
fn intersection_of_polygons() {
    let bridge = bridge();
    let a = geom("POLYGON((0 0,4 0,4 4,0 4,0 0))");
    let b = geom("POLYGON((2 2,6 2,6 6,2 6,2 2))");

    let overlap = bridge.st_intersection(Some(&a), Some(&b)).unwrap().unwrap();
    let area = bridge.st_area(Some(&overlap)).unwrap().unwrap();
    assert!((area - 4.0).abs() < 1e-9);

    assert_eq!(bridge.st_intersection(Some(&a), None).unwrap(), None);
}

#[test]
fn unsupported_functions_fail_loudly() {
    let bridge = bridge();
    let point = geom("POINT(1 2)");

    assert!(matches!(
        bridge.st_buffer(Some(&point), 1.5).unwrap_err(),
        BridgeError::Unsupported(_)
    ));
    assert!(matches!(
        bridge
            .st_transform(Some(&point), "epsg:4326", "epsg:3857", false, false)
            .unwrap_err(),
        BridgeError::Unsupported(_)
    ));

    // Same-CRS transforms are the identity, with optional axis swapping
    let swapped = bridge
        .st_transform(Some(&point), "epsg:4326", "EPSG:4326", false, true)
        .unwrap()
        .unwrap();
    assert_wkt_eq(&swapped, "POINT(2 1)");
}
