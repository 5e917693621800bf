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

//! Delimited-text loaders for typed spatial collections
//!
//! Each loader reads one geometry per line. Numeric splitters consume a
//! fixed run of columns starting at `offset` (two coordinates for points,
//! four bounds for rectangles, a coordinate list for polygons); the WKT
//! splitter reads the geometry from the single column at `offset`. All
//! unconsumed columns become the record's attributes, tab-joined in file
//! order. Parse failures carry the one-based line number.
use std::fs;

use geo_types::{Coord, Geometry as GeoGeometry, LineString, Polygon};

use geobridge::record::USER_DATA_DELIMITER;
use geobridge::SpatialRecord;
use geobridge_common::{BridgeError, FileSplitter, Result};
use geobridge_geometry::{Envelope, Geometry};

/// Which geometry shape a loader expects per line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Rectangle,
    Polygon,
}

/// Load a delimited text file into spatial records
pub fn load(
    location: &str,
    kind: GeometryKind,
    splitter: FileSplitter,
    offset: usize,
) -> Result<Vec<SpatialRecord>> {
    if splitter == FileSplitter::Wkb {
        return Err(BridgeError::Unsupported(
            "wkb input is not supported by the local engine".to_string(),
        ));
    }

    let contents = fs::read_to_string(location)?;
    let mut records = Vec::new();
    for (line_index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_line(line, kind, splitter, offset)
            .map_err(|e| BridgeError::Invalid(format!("line {}: {e}", line_index + 1)))?;
        records.push(record);
    }
    log::debug!("loaded {} {kind:?} records from {location}", records.len());
    Ok(records)
}

fn parse_line(
    line: &str,
    kind: GeometryKind,
    splitter: FileSplitter,
    offset: usize,
) -> Result<SpatialRecord> {
    let fields: Vec<&str> = line.split(splitter.delimiter()).collect();

    let (geometry, consumed) = if splitter == FileSplitter::Wkt {
        (parse_wkt_field(&fields, kind, offset)?, offset..offset + 1)
    } else {
        match kind {
            GeometryKind::Point => (parse_point(&fields, offset)?, offset..offset + 2),
            GeometryKind::Rectangle => (parse_rectangle(&fields, offset)?, offset..offset + 4),
            // A numeric polygon line consumes everything from the offset on
            GeometryKind::Polygon => (parse_coordinate_ring(&fields, offset)?, offset..fields.len()),
        }
    };

    let attributes: Vec<&str> = fields
        .iter()
        .enumerate()
        .filter(|(index, _)| !consumed.contains(index))
        .map(|(_, field)| *field)
        .collect();
    let user_data = attributes.join(&USER_DATA_DELIMITER.to_string());

    Ok(SpatialRecord::new(geometry, user_data))
}

fn parse_wkt_field(fields: &[&str], kind: GeometryKind, offset: usize) -> Result<Geometry> {
    let text = field_at(fields, offset)?;
    let geometry = Geometry::from_wkt(text)?;
    match (kind, geometry.as_geo()) {
        (GeometryKind::Point, GeoGeometry::Point(_)) => Ok(geometry),
        (GeometryKind::Polygon, GeoGeometry::Polygon(_) | GeoGeometry::MultiPolygon(_)) => {
            Ok(geometry)
        }
        // Rectangle input keeps only the bounds of whatever was written
        (GeometryKind::Rectangle, _) => {
            let envelope = geometry.envelope().ok_or_else(|| {
                BridgeError::Invalid("empty geometry has no rectangle bounds".to_string())
            })?;
            Ok(Geometry::from(GeoGeometry::Polygon(envelope.to_polygon())))
        }
        (kind, _) => Err(BridgeError::Invalid(format!(
            "expected a {kind:?} geometry, found {}",
            geometry.geometry_type()
        ))),
    }
}

fn parse_point(fields: &[&str], offset: usize) -> Result<Geometry> {
    let x = parse_f64(fields, offset)?;
    let y = parse_f64(fields, offset + 1)?;
    Ok(Geometry::from(GeoGeometry::Point(geo_types::Point::new(
        x, y,
    ))))
}

fn parse_rectangle(fields: &[&str], offset: usize) -> Result<Geometry> {
    let min_x = parse_f64(fields, offset)?;
    let min_y = parse_f64(fields, offset + 1)?;
    let max_x = parse_f64(fields, offset + 2)?;
    let max_y = parse_f64(fields, offset + 3)?;
    let envelope = Envelope::new(min_x, max_x, min_y, max_y)?;
    Ok(Geometry::from(GeoGeometry::Polygon(envelope.to_polygon())))
}

fn parse_coordinate_ring(fields: &[&str], offset: usize) -> Result<Geometry> {
    let values: Vec<f64> = (offset..fields.len())
        .map(|index| parse_f64(fields, index))
        .collect::<Result<_>>()?;
    if values.len() < 6 || values.len() % 2 != 0 {
        return Err(BridgeError::Invalid(format!(
            "a polygon needs an even coordinate list of at least three points, found {} values",
            values.len()
        )));
    }

    let mut coords: Vec<Coord<f64>> = values
        .chunks_exact(2)
        .map(|pair| Coord {
            x: pair[0],
            y: pair[1],
        })
        .collect();
    if coords.first() != coords.last() {
        coords.push(coords[0]);
    }
    Ok(Geometry::from(GeoGeometry::Polygon(Polygon::new(
        LineString::new(coords),
        vec![],
    ))))
}

fn field_at<'a>(fields: &[&'a str], index: usize) -> Result<&'a str> {
    fields.get(index).copied().ok_or_else(|| {
        BridgeError::Invalid(format!(
            "column {index} is out of range for a record with {} columns",
            fields.len()
        ))
    })
}

fn parse_f64(fields: &[&str], index: usize) -> Result<f64> {
    let field = field_at(fields, index)?;
    field.trim().parse::<f64>().map_err(|_| {
        BridgeError::Invalid(format!("column {index} is not a number: {field:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobridge_testing::fixture_file;

    #[test]
    fn points_with_attributes() {
        let file = fixture_file("1.5,2.5,first,extra\n3.0,4.0,second,more\n");
        let records = load(
            file.path().to_str().unwrap(),
            GeometryKind::Point,
            FileSplitter::Csv,
            0,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].geometry().to_wkt(), "POINT(1.5 2.5)");
        assert_eq!(records[0].user_fields(), vec!["first", "extra"]);
    }

    #[test]
    fn point_offset_keeps_leading_columns_as_attributes() {
        let file = fixture_file("id9,1.0,2.0,tail\n");
        let records = load(
            file.path().to_str().unwrap(),
            GeometryKind::Point,
            FileSplitter::Csv,
            1,
        )
        .unwrap();
        assert_eq!(records[0].user_fields(), vec!["id9", "tail"]);
    }

    #[test]
    fn rectangles_read_min_min_max_max() {
        let file = fixture_file("0,0,4,4,alpha,10\n");
        let records = load(
            file.path().to_str().unwrap(),
            GeometryKind::Rectangle,
            FileSplitter::Csv,
            0,
        )
        .unwrap();

        let env = records[0].geometry().envelope().unwrap();
        assert_eq!(env, Envelope::new(0.0, 4.0, 0.0, 4.0).unwrap());
        assert_eq!(records[0].user_fields(), vec!["alpha", "10"]);
    }

    #[test]
    fn polygons_from_wkt_lines() {
        let file = fixture_file("POLYGON((0 0,3 0,3 3,0 3,0 0))\tpatch\n");
        let records = load(
            file.path().to_str().unwrap(),
            GeometryKind::Polygon,
            FileSplitter::Wkt,
            0,
        )
        .unwrap();
        assert_eq!(records[0].geometry().geometry_type(), "Polygon");
        assert_eq!(records[0].user_fields(), vec!["patch"]);
    }

    #[test]
    fn polygons_from_coordinate_lists_close_the_ring() {
        let file = fixture_file("0,0,4,0,4,4,0,4\n");
        let records = load(
            file.path().to_str().unwrap(),
            GeometryKind::Polygon,
            FileSplitter::Csv,
            0,
        )
        .unwrap();
        let env = records[0].geometry().envelope().unwrap();
        assert_eq!(env, Envelope::new(0.0, 4.0, 0.0, 4.0).unwrap());
    }

    #[test]
    fn malformed_lines_carry_line_numbers() {
        let file = fixture_file("0,0,4,4,ok,1\n0,0,four,4,bad,2\n");
        let err = load(
            file.path().to_str().unwrap(),
            GeometryKind::Rectangle,
            FileSplitter::Csv,
            0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn wkb_is_unsupported() {
        let file = fixture_file("");
        let err = load(
            file.path().to_str().unwrap(),
            GeometryKind::Point,
            FileSplitter::Wkb,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::Unsupported(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(
            "/nonexistent/geobridge-fixture.csv",
            GeometryKind::Point,
            FileSplitter::Csv,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::IO(_)));
    }
}
