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

//! Conversions between dataframes and spatial collections
//!
//! Every conversion except pair flattening is a single remote call; the
//! variants carry distinct names so each is reachable and individually
//! testable. Pair flattening runs locally: it materializes the join result,
//! splits each side's tab-joined user data into columns, and registers the
//! rebuilt batches as a new dataframe.
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};

use geobridge_common::{BridgeError, Result};

use crate::dataframe::DataFrame;
use crate::rdd::{SpatialPairRdd, SpatialRdd};
use crate::record::SpatialRecord;

/// Stateless dataframe/spatial RDD conversion operations
pub struct Adapter;

impl Adapter {
    /// Dataframe to a generic (untyped) spatial collection
    pub fn to_rdd(df: &DataFrame) -> Result<SpatialRdd> {
        let href = df.bridge().df_to_rdd(df.href()?)?;
        Ok(SpatialRdd::new(df.bridge().clone(), href))
    }

    /// Dataframe to a spatial collection, taking the first column as the
    /// geometry and the rest as attributes
    pub fn to_spatial_rdd(df: &DataFrame) -> Result<SpatialRdd> {
        let href = df.bridge().df_to_spatial_rdd(df.href()?)?;
        Ok(SpatialRdd::new(df.bridge().clone(), href))
    }

    /// Dataframe to a spatial collection with an explicit geometry column
    pub fn to_spatial_rdd_with_geometry_field(
        df: &DataFrame,
        geometry_field: &str,
    ) -> Result<SpatialRdd> {
        let href = df
            .bridge()
            .df_to_spatial_rdd_with_geometry_field(df.href()?, geometry_field)?;
        Ok(SpatialRdd::new(df.bridge().clone(), href))
    }

    /// Dataframe to a spatial collection keeping only the named attribute
    /// columns
    pub fn to_spatial_rdd_with_fields(
        df: &DataFrame,
        field_names: &[String],
    ) -> Result<SpatialRdd> {
        let href = df
            .bridge()
            .df_to_spatial_rdd_with_fields(df.href()?, field_names)?;
        Ok(SpatialRdd::new(df.bridge().clone(), href))
    }

    /// Spatial collection back to a dataframe with positional column names
    pub fn to_df(rdd: &SpatialRdd) -> Result<DataFrame> {
        let href = rdd.bridge().rdd_to_df(rdd.href()?, None)?;
        Ok(DataFrame::new(rdd.bridge().clone(), href))
    }

    /// Spatial collection back to a dataframe with named attribute columns
    ///
    /// The name count must match the records' attribute field count.
    pub fn to_df_with_fields(rdd: &SpatialRdd, field_names: &[String]) -> Result<DataFrame> {
        let href = rdd.bridge().rdd_to_df(rdd.href()?, Some(field_names))?;
        Ok(DataFrame::new(rdd.bridge().clone(), href))
    }

    /// Flatten a join result into a dataframe with positional column names
    ///
    /// Attribute arity is inferred from the first pair, so an empty result
    /// cannot be flattened without names.
    pub fn pair_rdd_to_df(pairs: &SpatialPairRdd) -> Result<DataFrame> {
        let collected = pairs.collect()?;
        let batch = flatten_pairs(&collected, None)?;
        let href = pairs.bridge().create_data_frame(vec![batch])?;
        Ok(DataFrame::new(pairs.bridge().clone(), href))
    }

    /// Flatten a join result into a dataframe with caller-supplied attribute
    /// column names
    ///
    /// The output layout is `geom_1`, the left attribute columns, `geom_2`,
    /// the right attribute columns. Name lists that disagree with the
    /// records' field counts fail with `ColumnMismatch`.
    pub fn pair_rdd_to_df_named(
        pairs: &SpatialPairRdd,
        left_field_names: &[String],
        right_field_names: &[String],
    ) -> Result<DataFrame> {
        let collected = pairs.collect()?;
        let batch = flatten_pairs(&collected, Some((left_field_names, right_field_names)))?;
        let href = pairs.bridge().create_data_frame(vec![batch])?;
        Ok(DataFrame::new(pairs.bridge().clone(), href))
    }
}

const LEFT_GEOMETRY_COLUMN: &str = "geom_1";
const RIGHT_GEOMETRY_COLUMN: &str = "geom_2";

/// Split join pairs into one Arrow batch of string columns
///
/// Geometry travels as WKT. Without names the attribute arity comes from
/// the first pair and columns are named positionally; with names the arity
/// comes from the name lists. Either way, every record must split into
/// exactly the expected field count.
fn flatten_pairs(
    pairs: &[(SpatialRecord, SpatialRecord)],
    field_names: Option<(&[String], &[String])>,
) -> Result<RecordBatch> {
    let (left_arity, right_arity) = match field_names {
        Some((left, right)) => {
            let expected = 2 + left.len() + right.len();
            if let Some((first_left, first_right)) = pairs.first() {
                let actual = 2 + first_left.user_fields().len() + first_right.user_fields().len();
                if expected != actual {
                    return Err(BridgeError::ColumnMismatch { expected, actual });
                }
            }
            (left.len(), right.len())
        }
        None => match pairs.first() {
            Some((left, right)) => (left.user_fields().len(), right.user_fields().len()),
            None => {
                return Err(BridgeError::Invalid(
                    "cannot infer a schema from an empty pair RDD".to_string(),
                ))
            }
        },
    };

    let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(pairs.len()); 2 + left_arity + right_arity];
    for (left, right) in pairs {
        let mut slot = 0;
        columns[slot].push(left.geometry().to_wkt());
        slot += 1;
        slot = push_fields(&mut columns, slot, left, left_arity)?;
        columns[slot].push(right.geometry().to_wkt());
        slot += 1;
        push_fields(&mut columns, slot, right, right_arity)?;
    }

    let mut fields = Vec::with_capacity(2 + left_arity + right_arity);
    fields.push(Field::new(LEFT_GEOMETRY_COLUMN, DataType::Utf8, false));
    match field_names {
        Some((left, right)) => {
            fields.extend(left.iter().map(|n| Field::new(n, DataType::Utf8, false)));
            fields.push(Field::new(RIGHT_GEOMETRY_COLUMN, DataType::Utf8, false));
            fields.extend(right.iter().map(|n| Field::new(n, DataType::Utf8, false)));
        }
        None => {
            fields.extend((0..left_arity).map(|i| Field::new(format!("left_{i}"), DataType::Utf8, false)));
            fields.push(Field::new(RIGHT_GEOMETRY_COLUMN, DataType::Utf8, false));
            fields.extend((0..right_arity).map(|i| Field::new(format!("right_{i}"), DataType::Utf8, false)));
        }
    }

    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|values| Arc::new(StringArray::from(values)) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .map_err(|e| BridgeError::External(Box::new(e)))
}

/// Append one record's attribute fields, enforcing the expected arity
fn push_fields(
    columns: &mut [Vec<String>],
    mut slot: usize,
    record: &SpatialRecord,
    expected: usize,
) -> Result<usize> {
    let fields = record.user_fields();
    if fields.len() != expected {
        return Err(BridgeError::UserData {
            expected,
            actual: fields.len(),
        });
    }
    for value in fields {
        columns[slot].push(value.to_string());
        slot += 1;
    }
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::Array;
    use geobridge_geometry::Geometry;

    fn record(wkt: &str, user_data: &str) -> SpatialRecord {
        SpatialRecord::new(Geometry::from_wkt(wkt).unwrap(), user_data)
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn column(batch: &RecordBatch, index: usize) -> Vec<String> {
        let array = batch
            .column(index)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        (0..array.len()).map(|i| array.value(i).to_string()).collect()
    }

    #[test]
    fn flatten_positional_names() {
        let pairs = vec![(
            record("POINT(0 0)", "a\t1"),
            record("POINT(1 1)", "b\t2\tx"),
        )];
        let batch = flatten_pairs(&pairs, None).unwrap();

        let schema = batch.schema();
        let columns: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            columns,
            vec!["geom_1", "left_0", "left_1", "geom_2", "right_0", "right_1", "right_2"]
        );
        assert_eq!(column(&batch, 1), vec!["a"]);
        assert_eq!(column(&batch, 6), vec!["x"]);
    }

    #[test]
    fn flatten_named_columns() {
        let pairs = vec![
            (record("POINT(0 0)", "a\t1"), record("POINT(1 1)", "b\t2")),
            (record("POINT(2 2)", "c\t3"), record("POINT(3 3)", "d\t4")),
        ];
        let batch = flatten_pairs(
            &pairs,
            Some((&names(&["name", "rank"]), &names(&["other", "score"]))),
        )
        .unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(1).name(), "name");
        assert_eq!(batch.schema().field(3).name(), "geom_2");
        assert_eq!(column(&batch, 4), vec!["b", "d"]);
    }

    #[test]
    fn named_flatten_rejects_wrong_name_count() {
        let pairs = vec![(record("POINT(0 0)", "a\t1"), record("POINT(1 1)", "b\t2"))];
        let err = flatten_pairs(
            &pairs,
            Some((&names(&["name", "rank"]), &names(&["other"]))),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::ColumnMismatch {
                expected: 5,
                actual: 6
            }
        ));
    }

    #[test]
    fn embedded_tab_is_an_explicit_error() {
        // A tab inside an attribute value shifts the split arity; this must
        // surface instead of silently misaligning columns.
        let pairs = vec![
            (record("POINT(0 0)", "a\t1"), record("POINT(1 1)", "b\t2")),
            (
                record("POINT(2 2)", "broken\tvalue\t3"),
                record("POINT(3 3)", "d\t4"),
            ),
        ];
        let err = flatten_pairs(&pairs, None).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::UserData {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn empty_pairs_need_names_for_a_schema() {
        let err = flatten_pairs(&[], None).unwrap_err();
        assert!(matches!(err, BridgeError::Invalid(_)));

        let batch = flatten_pairs(&[], Some((&names(&["name"]), &names(&[])))).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 3);
    }

    #[test]
    fn attribute_free_records_flatten_to_geometry_only_columns() {
        let pairs = vec![(record("POINT(0 0)", ""), record("POINT(1 1)", ""))];
        let batch = flatten_pairs(&pairs, None).unwrap();
        assert_eq!(batch.num_columns(), 2);
        assert_eq!(column(&batch, 0), vec!["POINT(0 0)"]);
    }
}
