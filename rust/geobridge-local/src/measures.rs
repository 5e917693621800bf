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

//! Planar measures and geometry transformations over `geo-types` values
use geo::{BooleanOps, Contains, ConvexHull, CoordsIter, Intersects, LinesIter, MapCoords};
use geo_types::{
    Coord, Geometry as GeoGeometry, Line, LineString, MultiPoint, MultiPolygon, Point, Polygon,
};

use geobridge_common::{BridgeError, Result};

/// Planar euclidean distance between two geometries, zero when they touch
/// or overlap
pub fn distance(a: &GeoGeometry<f64>, b: &GeoGeometry<f64>) -> f64 {
    if a.intersects(b) {
        return 0.0;
    }

    let a_coords: Vec<Coord<f64>> = a.coords_iter().collect();
    let b_coords: Vec<Coord<f64>> = b.coords_iter().collect();
    let a_lines = lines_of(a);
    let b_lines = lines_of(b);

    let mut best = f64::INFINITY;
    for ca in &a_coords {
        for cb in &b_coords {
            best = best.min(coord_distance(*ca, *cb));
        }
        for lb in &b_lines {
            best = best.min(coord_segment_distance(*ca, lb));
        }
    }
    for cb in &b_coords {
        for la in &a_lines {
            best = best.min(coord_segment_distance(*cb, la));
        }
    }
    best
}

/// Total segment length (perimeter for areal geometries, zero for points)
pub fn length(geom: &GeoGeometry<f64>) -> f64 {
    lines_of(geom)
        .iter()
        .map(|line| coord_distance(line.start, line.end))
        .sum()
}

/// Every segment of a geometry, descending into collections
///
/// The segment iteration traits only exist on the concrete geometry types,
/// so the enum is dispatched here. Points contribute nothing.
fn lines_of(geom: &GeoGeometry<f64>) -> Vec<Line<f64>> {
    let mut lines = Vec::new();
    collect_lines(geom, &mut lines);
    lines
}

fn collect_lines(geom: &GeoGeometry<f64>, lines: &mut Vec<Line<f64>>) {
    match geom {
        GeoGeometry::Point(_) | GeoGeometry::MultiPoint(_) => {}
        GeoGeometry::Line(line) => lines.push(*line),
        GeoGeometry::LineString(ls) => lines.extend(ls.lines_iter()),
        GeoGeometry::MultiLineString(mls) => lines.extend(mls.lines_iter()),
        GeoGeometry::Polygon(polygon) => lines.extend(polygon.lines_iter()),
        GeoGeometry::MultiPolygon(multi) => lines.extend(multi.lines_iter()),
        GeoGeometry::Rect(rect) => lines.extend(Polygon::from(*rect).lines_iter()),
        GeoGeometry::Triangle(triangle) => lines.extend(Polygon::from(*triangle).lines_iter()),
        GeoGeometry::GeometryCollection(collection) => {
            for inner in collection.iter() {
                collect_lines(inner, lines);
            }
        }
    }
}

/// Structural validity: every ring is simple and every hole lies inside
/// its shell. Non-areal geometries are always valid here.
pub fn is_valid(geom: &GeoGeometry<f64>) -> bool {
    match geom {
        GeoGeometry::Polygon(polygon) => polygon_is_valid(polygon),
        GeoGeometry::MultiPolygon(multi) => multi.iter().all(polygon_is_valid),
        GeoGeometry::GeometryCollection(collection) => collection.iter().all(is_valid),
        _ => true,
    }
}

fn polygon_is_valid(polygon: &Polygon<f64>) -> bool {
    if !ring_is_simple(polygon.exterior()) {
        return false;
    }
    for hole in polygon.interiors() {
        if !ring_is_simple(hole) {
            return false;
        }
        let shell = Polygon::new(polygon.exterior().clone(), vec![]);
        if !hole.coords_iter().all(|c| shell.intersects(&Point::from(c))) {
            return false;
        }
    }
    true
}

/// A ring is simple when no two non-adjacent segments intersect. Adjacent
/// segments share exactly their common endpoint by construction, and the
/// first and last segments count as adjacent.
fn ring_is_simple(ring: &LineString<f64>) -> bool {
    let segments: Vec<Line<f64>> = ring.lines_iter().collect();
    let n = segments.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments[i].intersects(&segments[j]) {
                return false;
            }
        }
    }
    true
}

/// Convex hull of the geometry's coordinates
///
/// Degenerate inputs collapse the way the wrapped engine's hulls do: a
/// single coordinate yields a point and two coordinates yield a segment.
pub fn convex_hull(geom: &GeoGeometry<f64>) -> GeoGeometry<f64> {
    let coords: Vec<Coord<f64>> = geom.coords_iter().collect();
    match coords.len() {
        0 => geom.clone(),
        1 => GeoGeometry::Point(Point::from(coords[0])),
        2 => GeoGeometry::LineString(LineString::new(coords)),
        _ => {
            let points = MultiPoint::from(
                coords.into_iter().map(Point::from).collect::<Vec<_>>(),
            );
            GeoGeometry::Polygon(points.convex_hull())
        }
    }
}

/// Areal intersection of two geometries
///
/// Only polygonal inputs are supported; everything else reports
/// `Unsupported`.
pub fn intersection(a: &GeoGeometry<f64>, b: &GeoGeometry<f64>) -> Result<GeoGeometry<f64>> {
    let left = to_multi_polygon(a)?;
    let right = to_multi_polygon(b)?;
    let result = left.intersection(&right);
    if result.0.len() == 1 {
        Ok(GeoGeometry::Polygon(result.0.into_iter().next().unwrap()))
    } else {
        Ok(GeoGeometry::MultiPolygon(result))
    }
}

fn to_multi_polygon(geom: &GeoGeometry<f64>) -> Result<MultiPolygon<f64>> {
    match geom {
        GeoGeometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon.clone()])),
        GeoGeometry::MultiPolygon(multi) => Ok(multi.clone()),
        GeoGeometry::Rect(rect) => Ok(MultiPolygon::new(vec![rect.to_polygon()])),
        _ => Err(BridgeError::Unsupported(
            "intersection of non-areal geometries".to_string(),
        )),
    }
}

/// Round every coordinate to `precision` decimal digits
pub fn precision_reduce(geom: &GeoGeometry<f64>, precision: u32) -> GeoGeometry<f64> {
    let factor = 10f64.powi(precision as i32);
    geom.map_coords(|Coord { x, y }| Coord {
        x: (x * factor).round() / factor,
        y: (y * factor).round() / factor,
    })
}

/// True when the query window is matched by the object under the requested
/// predicate: intersection, or containment of the object in the window
pub fn matches_window(
    window: &GeoGeometry<f64>,
    object: &GeoGeometry<f64>,
    consider_boundary_intersection: bool,
) -> bool {
    if consider_boundary_intersection {
        window.intersects(object)
    } else {
        window.contains(object)
    }
}

fn coord_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from a coordinate to the nearest point of a segment
fn coord_segment_distance(c: Coord<f64>, segment: &Line<f64>) -> f64 {
    let d = segment.delta();
    let len_sq = d.x * d.x + d.y * d.y;
    if len_sq == 0.0 {
        return coord_distance(c, segment.start);
    }
    let t = ((c.x - segment.start.x) * d.x + (c.y - segment.start.y) * d.y) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let nearest = Coord {
        x: segment.start.x + t * d.x,
        y: segment.start.y + t * d.y,
    };
    coord_distance(c, nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobridge_geometry::Geometry;

    fn geom(wkt: &str) -> GeoGeometry<f64> {
        Geometry::from_wkt(wkt).unwrap().into_geo()
    }

    #[test]
    fn distance_between_points() {
        assert_eq!(distance(&geom("POINT(0 0)"), &geom("POINT(3 4)")), 5.0);
    }

    #[test]
    fn distance_point_to_segment_interior() {
        // Nearest point is the projection onto the segment, not an endpoint
        let d = distance(&geom("POINT(5 3)"), &geom("LINESTRING(0 0,10 0)"));
        assert_eq!(d, 3.0);
    }

    #[test]
    fn distance_is_zero_for_overlap() {
        let a = geom("POLYGON((0 0,4 0,4 4,0 4,0 0))");
        let b = geom("POINT(2 2)");
        assert_eq!(distance(&a, &b), 0.0);
    }

    #[test]
    fn length_of_open_line() {
        assert_eq!(length(&geom("LINESTRING(0 0,3 0,3 4)")), 7.0);
        assert_eq!(length(&geom("POINT(1 1)")), 0.0);
    }

    #[test]
    fn length_descends_into_collections() {
        let mixed = geom(
            "GEOMETRYCOLLECTION(LINESTRING(0 0,3 0),POINT(9 9),POLYGON((0 0,1 0,1 1,0 1,0 0)))",
        );
        assert_eq!(length(&mixed), 7.0);
    }

    #[test]
    fn distance_handles_every_top_level_variant() {
        // Dispatch over the geometry enum: the nearest part of the
        // collection is the line string's interior, not a vertex
        let collection = geom("GEOMETRYCOLLECTION(POINT(9 9),LINESTRING(0 0,10 0))");
        assert_eq!(distance(&geom("POINT(5 2)"), &collection), 2.0);
        assert_eq!(
            distance(&geom("MULTIPOINT(0 5,1 5)"), &geom("POLYGON((0 0,2 0,2 2,0 2,0 0))")),
            3.0
        );
    }

    #[test]
    fn bowtie_ring_is_invalid() {
        assert!(!is_valid(&geom("POLYGON((0 0,4 4,4 0,0 4,0 0))")));
        assert!(is_valid(&geom("POLYGON((0 0,4 0,4 4,0 4,0 0))")));
    }

    #[test]
    fn hole_outside_shell_is_invalid() {
        let escaped = geom("POLYGON((0 0,4 0,4 4,0 4,0 0),(6 6,7 6,7 7,6 7,6 6))");
        assert!(!is_valid(&escaped));
        let nested = geom("POLYGON((0 0,4 0,4 4,0 4,0 0),(1 1,2 1,2 2,1 2,1 1))");
        assert!(is_valid(&nested));
    }

    #[test]
    fn hull_of_degenerate_inputs() {
        assert_eq!(convex_hull(&geom("POINT(2 3)")), geom("POINT(2 3)"));
        assert_eq!(
            convex_hull(&geom("MULTIPOINT(0 0,1 1)")),
            geom("LINESTRING(0 0,1 1)")
        );
    }

    #[test]
    fn hull_of_square_contains_all_corners() {
        let hull = convex_hull(&geom("MULTIPOINT(0 0,4 0,4 4,0 4,2 2)"));
        match hull {
            GeoGeometry::Polygon(polygon) => {
                assert_eq!(polygon.exterior().coords_count(), 5);
                assert!(polygon.contains(&Point::new(2.0, 2.0)));
            }
            other => panic!("expected a polygon hull, got {other:?}"),
        }
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let a = geom("POLYGON((0 0,4 0,4 4,0 4,0 0))");
        let b = geom("POLYGON((2 2,6 2,6 6,2 6,2 2))");
        let result = intersection(&a, &b).unwrap();
        assert!((geo::Area::unsigned_area(&result) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn intersection_of_disjoint_squares_is_empty() {
        let a = geom("POLYGON((0 0,1 0,1 1,0 1,0 0))");
        let b = geom("POLYGON((5 5,6 5,6 6,5 6,5 5))");
        let result = intersection(&a, &b).unwrap();
        assert_eq!(geo::Area::unsigned_area(&result), 0.0);
    }

    #[test]
    fn intersection_rejects_lines() {
        let err = intersection(&geom("LINESTRING(0 0,1 1)"), &geom("POINT(0 0)")).unwrap_err();
        assert!(matches!(err, BridgeError::Unsupported(_)));
    }

    #[test]
    fn precision_reduce_rounds_coordinates() {
        let reduced = precision_reduce(&geom("POINT(1.23456789 9.87654321)"), 3);
        assert_eq!(reduced, geom("POINT(1.235 9.877)"));
    }

    #[test]
    fn window_predicates() {
        let window = geom("POLYGON((0 0,4 0,4 4,0 4,0 0))");
        let crossing = geom("LINESTRING(3 3,6 6)");
        assert!(matches_window(&window, &crossing, true));
        assert!(!matches_window(&window, &crossing, false));
        assert!(matches_window(&window, &geom("POINT(1 1)"), false));
    }
}
