//! Immutable in-memory datasets backed by Arrow record batches.
//!
//! A [`Dataset`] is what a loader hands to the engine: a name plus a
//! [`RecordBatch`] whose columns are restricted to the four types the engine
//! understands (see [`ColumnType`]). Once built it is never mutated; the
//! corruption harness produces new datasets instead.
//!
//! # Examples
//!
//! ```rust
//! use quality_guard::core::{ColumnType, Dataset, Value};
//!
//! let equipment = Dataset::builder("equipment")
//!     .column("equipment_id", ColumnType::Text, ["E1", "E2"])
//!     .column("engine_hours", ColumnType::Float, [Value::Float(120.5), Value::Null])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(equipment.row_count(), 2);
//! assert_eq!(equipment.column_names(), vec!["equipment_id", "engine_hours"]);
//! ```

use super::value::Value;
use crate::prelude::*;
use arrow::array::{
    Array, ArrayRef, AsArray, Date32Array, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Date32Type, Field, Float64Type, Int64Type, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Arrow `Int64`
    Integer,
    /// Arrow `Float64`
    Float,
    /// Arrow `Utf8`
    Text,
    /// Arrow `Date32`
    Date,
}

impl ColumnType {
    /// The Arrow data type used to store this column.
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnType::Integer => DataType::Int64,
            ColumnType::Float => DataType::Float64,
            ColumnType::Text => DataType::Utf8,
            ColumnType::Date => DataType::Date32,
        }
    }

    /// Maps an Arrow data type back onto a column type.
    pub fn from_data_type(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Int64 => Some(ColumnType::Integer),
            DataType::Float64 => Some(ColumnType::Float),
            DataType::Utf8 => Some(ColumnType::Text),
            DataType::Date32 => Some(ColumnType::Date),
            _ => None,
        }
    }

    /// Returns true for integer and float columns.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Returns true if `value` can be stored in a column of this type.
    ///
    /// Nulls fit every column. Integer columns take integral floats within
    /// `i64` range, float columns take integers.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            ColumnType::Integer => value.as_i64().is_some(),
            ColumnType::Float => value.as_f64().is_some(),
            ColumnType::Text => matches!(value, Value::Text(_)),
            ColumnType::Date => matches!(value, Value::Date(_)),
        }
    }

    /// Lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and type of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

/// Ordered column layout of a dataset.
///
/// Suites are built against a schema rather than a concrete dataset so the
/// same suite can be reused for every snapshot of the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    dataset: String,
    columns: Vec<ColumnSchema>,
}

impl DatasetSchema {
    /// Creates a schema, rejecting duplicate column names.
    pub fn new(dataset: impl Into<String>, columns: Vec<ColumnSchema>) -> Result<Self> {
        let dataset = dataset.into();
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(GuardError::DuplicateColumn {
                    dataset,
                    column: column.name.clone(),
                });
            }
        }
        Ok(Self { dataset, columns })
    }

    /// Name of the dataset this schema describes.
    pub fn dataset_name(&self) -> &str {
        &self.dataset
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.name == column)
    }

    /// Position of a column, if present.
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }

    /// Resolves a column to its type or fails with [`GuardError::ColumnNotFound`].
    pub fn resolve(&self, column: &str) -> Result<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.column_type)
            .ok_or_else(|| GuardError::ColumnNotFound {
                dataset: self.dataset.clone(),
                column: column.to_string(),
            })
    }
}

/// A named, immutable table.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    schema: DatasetSchema,
    batch: RecordBatch,
}

impl Dataset {
    /// Starts building a dataset column by column.
    pub fn builder(name: impl Into<String>) -> DatasetBuilder {
        DatasetBuilder::new(name)
    }

    /// Wraps an existing record batch.
    ///
    /// Every column must be `Int64`, `Float64`, `Utf8` or `Date32`, and column
    /// names must be unique.
    pub fn try_new(name: impl Into<String>, batch: RecordBatch) -> Result<Self> {
        let name = name.into();
        let columns = batch
            .schema()
            .fields()
            .iter()
            .map(|field| {
                ColumnType::from_data_type(field.data_type())
                    .map(|column_type| ColumnSchema {
                        name: field.name().clone(),
                        column_type,
                    })
                    .ok_or_else(|| GuardError::UnsupportedType {
                        column: field.name().clone(),
                        data_type: field.data_type().to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let schema = DatasetSchema::new(name.clone(), columns)?;
        Ok(Self {
            name,
            schema,
            batch,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The underlying Arrow batch.
    pub fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Read-only view of one column.
    pub fn column(&self, name: &str) -> Result<Column<'_>> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| GuardError::ColumnNotFound {
                dataset: self.name.clone(),
                column: name.to_string(),
            })?;
        let schema = &self.schema.columns[index];
        Ok(Column {
            name: &schema.name,
            column_type: schema.column_type,
            array: self.batch.column(index),
        })
    }

    /// Value of a single cell.
    pub fn value(&self, column: &str, row: usize) -> Result<Value> {
        let column = self.column(column)?;
        if row >= column.len() {
            return Err(GuardError::Configuration(format!(
                "row {row} is out of bounds for dataset '{}' with {} rows",
                self.name,
                self.row_count()
            )));
        }
        Ok(column.value(row))
    }

    /// All columns materialized as values, in schema order.
    pub(crate) fn to_columns(&self) -> Vec<Vec<Value>> {
        (0..self.batch.num_columns())
            .map(|index| {
                let schema = &self.schema.columns[index];
                Column {
                    name: &schema.name,
                    column_type: schema.column_type,
                    array: self.batch.column(index),
                }
                .values()
            })
            .collect()
    }

    /// Builds a sibling dataset with the same name and schema but new data.
    pub(crate) fn with_columns(&self, columns: Vec<Vec<Value>>) -> Result<Dataset> {
        let mut builder = Dataset::builder(self.name.clone());
        for (schema, values) in self.schema.columns.iter().zip(columns) {
            builder = builder.column(schema.name.clone(), schema.column_type, values);
        }
        builder.build()
    }
}

/// Borrowed view of one dataset column.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    name: &'a str,
    column_type: ColumnType,
    array: &'a ArrayRef,
}

impl<'a> Column<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Value at `row`. Panics if `row` is out of bounds, like Arrow does.
    pub fn value(&self, row: usize) -> Value {
        if self.array.is_null(row) {
            return Value::Null;
        }
        match self.column_type {
            ColumnType::Integer => Value::Int(self.array.as_primitive::<Int64Type>().value(row)),
            ColumnType::Float => {
                let v = self.array.as_primitive::<Float64Type>().value(row);
                if v.is_nan() {
                    Value::Null
                } else {
                    Value::Float(v)
                }
            }
            ColumnType::Text => Value::Text(self.array.as_string::<i32>().value(row).to_string()),
            ColumnType::Date => {
                date_from_days(self.array.as_primitive::<Date32Type>().value(row))
                    .map_or(Value::Null, Value::Date)
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + 'a {
        let column = *self;
        (0..column.len()).map(move |row| column.value(row))
    }

    pub fn values(&self) -> Vec<Value> {
        self.iter().collect()
    }
}

/// Incremental constructor for [`Dataset`].
#[derive(Debug)]
pub struct DatasetBuilder {
    name: String,
    columns: Vec<(String, ColumnType, Vec<Value>)>,
}

impl DatasetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Appends a column. Values are coerced to `column_type` on [`build`](Self::build).
    pub fn column<I, V>(
        mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.columns.push((
            name.into(),
            column_type,
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn build(self) -> Result<Dataset> {
        let row_count = self.columns.first().map_or(0, |(_, _, values)| values.len());
        let mut fields = Vec::with_capacity(self.columns.len());
        let mut arrays = Vec::with_capacity(self.columns.len());
        let mut columns = Vec::with_capacity(self.columns.len());

        for (name, column_type, values) in self.columns {
            if values.len() != row_count {
                return Err(GuardError::Configuration(format!(
                    "column '{name}' of dataset '{}' has {} rows, expected {row_count}",
                    self.name,
                    values.len()
                )));
            }
            arrays.push(build_array(&name, column_type, &values)?);
            fields.push(Field::new(name.clone(), column_type.data_type(), true));
            columns.push(ColumnSchema { name, column_type });
        }

        let schema = DatasetSchema::new(self.name.clone(), columns)?;
        let options = RecordBatchOptions::new().with_row_count(Some(row_count));
        let batch =
            RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;

        Ok(Dataset {
            name: self.name,
            schema,
            batch,
        })
    }
}

fn build_array(column: &str, column_type: ColumnType, values: &[Value]) -> Result<ArrayRef> {
    let mismatch = |value: &Value| {
        GuardError::type_mismatch(
            format!("{column_type} value for column '{column}'"),
            value.type_name(),
        )
    };

    let array: ArrayRef = match column_type {
        ColumnType::Integer => Arc::new(Int64Array::from(
            values
                .iter()
                .map(|value| match value.as_i64() {
                    Some(v) => Ok(Some(v)),
                    None if value.is_null() => Ok(None),
                    None => Err(mismatch(value)),
                })
                .collect::<Result<Vec<_>>>()?,
        )),
        ColumnType::Float => Arc::new(Float64Array::from(
            values
                .iter()
                .map(|value| match value.as_f64() {
                    Some(v) => Ok(Some(v)),
                    None if value.is_null() => Ok(None),
                    None => Err(mismatch(value)),
                })
                .collect::<Result<Vec<_>>>()?,
        )),
        ColumnType::Text => Arc::new(StringArray::from(
            values
                .iter()
                .map(|value| match value {
                    Value::Null => Ok(None),
                    Value::Text(v) => Ok(Some(v.clone())),
                    other => Err(mismatch(other)),
                })
                .collect::<Result<Vec<_>>>()?,
        )),
        ColumnType::Date => Arc::new(Date32Array::from(
            values
                .iter()
                .map(|value| match value {
                    Value::Null => Ok(None),
                    Value::Date(v) => Ok(Some(days_from_date(*v))),
                    other => Err(mismatch(other)),
                })
                .collect::<Result<Vec<_>>>()?,
        )),
    };
    Ok(array)
}

fn days_from_date(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}
