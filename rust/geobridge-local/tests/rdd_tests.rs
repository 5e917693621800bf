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
use std::sync::Arc;

use geobridge::bridge::{RddRef, SpatialBridge};
use geobridge::SpatialContext;
use geobridge_common::{BridgeError, FileSplitter, GridType};
use geobridge_geometry::Envelope;
use geobridge_local::LocalBridge;
use geobridge_testing::{fixture_file, MIXED_WKT_TSV, POINTS_CSV, RECTANGLES_CSV};

fn context() -> SpatialContext {
    SpatialContext::new(Arc::new(LocalBridge::new()))
}

#[test]
fn typed_construction_from_delimited_text() {
    let ctx = context();

    let points_file = fixture_file(POINTS_CSV);
    let points = ctx
        .create_point_rdd(points_file.path().to_str().unwrap(), FileSplitter::Csv, 0, 2)
        .unwrap();
    assert_eq!(points.count().unwrap(), 10);

    let rect_file = fixture_file(RECTANGLES_CSV);
    let rectangles = ctx
        .create_rectangle_rdd(rect_file.path().to_str().unwrap(), FileSplitter::Csv, 0, 2)
        .unwrap();
    assert_eq!(rectangles.count().unwrap(), 5);

    let wkt_file = fixture_file(MIXED_WKT_TSV);
    let polygons = ctx
        .create_polygon_rdd(wkt_file.path().to_str().unwrap(), FileSplitter::Wkt, 0, 2);
    // The mixed fixture holds a point and a line besides the polygon
    assert!(polygons.is_err());
}

#[test]
fn analyze_reports_count_and_boundary() {
    let ctx = context();
    let file = fixture_file(RECTANGLES_CSV);
    let rdd = ctx
        .create_rectangle_rdd(file.path().to_str().unwrap(), FileSplitter::Csv, 0, 2)
        .unwrap();

    let stats = rdd.analyze().unwrap();
    assert_eq!(stats.count, 5);
    assert_eq!(
        stats.boundary.unwrap(),
        Envelope::new(0.0, 9.0, 0.0, 9.0).unwrap()
    );
    assert_eq!(rdd.boundary_envelope().unwrap(), stats.boundary);
}

#[test]
fn release_is_explicit_and_final() {
    let ctx = context();
    let file = fixture_file(POINTS_CSV);
    let path = file.path().to_str().unwrap();
    let rdd = ctx
        .create_point_rdd(path, FileSplitter::Csv, 0, 1)
        .unwrap();

    let other = ctx.create_point_rdd(path, FileSplitter::Csv, 0, 1).unwrap();
    // Release consumes the handle, so reuse is impossible by construction
    other.release().unwrap();
    assert_eq!(rdd.count().unwrap(), 10);
}

#[test]
fn handles_format_without_exposing_the_bridge() {
    let ctx = context();
    let file = fixture_file(RECTANGLES_CSV);
    let rdd = ctx
        .create_rectangle_rdd(file.path().to_str().unwrap(), FileSplitter::Csv, 0, 2)
        .unwrap();
    let partitioner = rdd.spatial_partitioning(GridType::KdbTree, 4).unwrap();

    let rendered = format!("{rdd:?}");
    assert!(rendered.starts_with("SpatialRdd"));
    assert!(rendered.contains("released: false"));

    let rendered = format!("{partitioner:?}");
    assert!(rendered.starts_with("SpatialPartitioner"));
    assert!(rendered.contains("grid_type"));
}

#[test]
fn foreign_references_are_invalid_handles() {
    let bridge = LocalBridge::new();
    let err = bridge.analyze(RddRef::new(424_242)).unwrap_err();
    assert!(matches!(err, BridgeError::InvalidHandle(_)));

    let err = bridge
        .release(geobridge::bridge::AnyRef::Rdd(RddRef::new(424_242)))
        .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidHandle(_)));
}

#[test]
fn dropping_a_handle_releases_the_remote_object() {
    let bridge = Arc::new(LocalBridge::new());
    let ctx = SpatialContext::new(bridge.clone());
    let file = fixture_file(POINTS_CSV);

    {
        let rdd = ctx
            .create_point_rdd(file.path().to_str().unwrap(), FileSplitter::Csv, 0, 1)
            .unwrap();
        assert_eq!(rdd.count().unwrap(), 10);
        // Dropped here without an explicit release
    }
    // The first minted id was 1; the engine has forgotten it
    assert!(matches!(
        bridge.analyze(RddRef::new(1)).unwrap_err(),
        BridgeError::InvalidHandle(_)
    ));
}

#[test]
fn invalid_parameters_are_rejected() {
    let ctx = context();
    let file = fixture_file(POINTS_CSV);
    let path = file.path().to_str().unwrap();

    let err = ctx
        .create_point_rdd(path, FileSplitter::Csv, 0, 0)
        .unwrap_err();
    assert!(matches!(err, BridgeError::Invalid(_)));

    let rdd = ctx.create_point_rdd(path, FileSplitter::Csv, 0, 1).unwrap();
    let err = rdd.spatial_partitioning(GridType::RTree, 0).unwrap_err();
    assert!(matches!(err, BridgeError::Invalid(_)));
}

#[test]
fn malformed_input_lines_fail_with_location() {
    let ctx = context();
    let file = fixture_file("1.0,2.0,fine\nnot-a-number,2.0,broken\n");
    let err = ctx
        .create_point_rdd(file.path().to_str().unwrap(), FileSplitter::Csv, 0, 1)
        .unwrap_err();
    assert!(matches!(err, BridgeError::Invalid(_)));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn partitioning_an_empty_collection_is_rejected() {
    let ctx = context();
    let file = fixture_file("");
    let rdd = ctx
        .create_point_rdd(file.path().to_str().unwrap(), FileSplitter::Csv, 0, 1)
        .unwrap();
    assert_eq!(rdd.count().unwrap(), 0);

    let err = rdd.spatial_partitioning(GridType::QuadTree, 4).unwrap_err();
    assert!(matches!(err, BridgeError::Invalid(_)));
}

#[test]
fn wkb_splitter_is_unsupported() {
    let ctx = context();
    let file = fixture_file(POINTS_CSV);
    let err = ctx
        .create_point_rdd(file.path().to_str().unwrap(), FileSplitter::Wkb, 0, 1)
        .unwrap_err();
    assert!(matches!(err, BridgeError::Unsupported(_)));
}
