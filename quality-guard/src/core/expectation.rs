//! Declarative data-quality rules.

use super::dataset::DatasetSchema;
use super::value::Value;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of an [`Expectation`], carried through to results and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationKind {
    NotNull,
    Unique,
    ValueInSet,
    Range,
    RowCountAtLeast,
    ForeignKey,
}

impl ExpectationKind {
    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectationKind::NotNull => "not_null",
            ExpectationKind::Unique => "unique",
            ExpectationKind::ValueInSet => "value_in_set",
            ExpectationKind::Range => "range",
            ExpectationKind::RowCountAtLeast => "row_count_at_least",
            ExpectationKind::ForeignKey => "foreign_key",
        }
    }

    /// Table-level kinds produce no per-row violations.
    pub fn is_table_level(&self) -> bool {
        matches!(self, ExpectationKind::RowCountAtLeast)
    }
}

impl fmt::Display for ExpectationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declarative rule over one dataset.
///
/// # Examples
///
/// ```rust
/// use quality_guard::core::{Expectation, ExpectationKind};
///
/// let rule = Expectation::between("fe_content_pct", 0.0, 100.0);
/// assert_eq!(rule.kind(), ExpectationKind::Range);
/// assert_eq!(rule.column(), Some("fe_content_pct"));
/// assert_eq!(rule.to_string(), "range(fe_content_pct, 0..=100)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    /// No value of `column` is null.
    NotNull { column: String },
    /// No two non-null values of `column` are equal.
    Unique { column: String },
    /// Every non-null value of `column` is one of `allowed`.
    ValueInSet { column: String, allowed: Vec<Value> },
    /// Every non-null value of `column` lies within the closed bounds.
    Range {
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// The dataset has at least `min` rows.
    RowCountAtLeast { min: usize },
    /// Every non-null value of `column` appears in
    /// `reference_dataset.reference_column`.
    ForeignKey {
        column: String,
        reference_dataset: String,
        reference_column: String,
    },
}

impl Expectation {
    pub fn not_null(column: impl Into<String>) -> Self {
        Self::NotNull {
            column: column.into(),
        }
    }

    pub fn unique(column: impl Into<String>) -> Self {
        Self::Unique {
            column: column.into(),
        }
    }

    pub fn in_set<I, V>(column: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::ValueInSet {
            column: column.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn range(column: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range {
            column: column.into(),
            min,
            max,
        }
    }

    /// Closed range `[min, max]`.
    pub fn between(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self::range(column, Some(min), Some(max))
    }

    /// Open-ended range `[min, ∞)`.
    pub fn at_least(column: impl Into<String>, min: f64) -> Self {
        Self::range(column, Some(min), None)
    }

    /// Open-ended range `(-∞, max]`.
    pub fn at_most(column: impl Into<String>, max: f64) -> Self {
        Self::range(column, None, Some(max))
    }

    pub fn row_count_at_least(min: usize) -> Self {
        Self::RowCountAtLeast { min }
    }

    pub fn foreign_key(
        column: impl Into<String>,
        reference_dataset: impl Into<String>,
        reference_column: impl Into<String>,
    ) -> Self {
        Self::ForeignKey {
            column: column.into(),
            reference_dataset: reference_dataset.into(),
            reference_column: reference_column.into(),
        }
    }

    pub fn kind(&self) -> ExpectationKind {
        match self {
            Expectation::NotNull { .. } => ExpectationKind::NotNull,
            Expectation::Unique { .. } => ExpectationKind::Unique,
            Expectation::ValueInSet { .. } => ExpectationKind::ValueInSet,
            Expectation::Range { .. } => ExpectationKind::Range,
            Expectation::RowCountAtLeast { .. } => ExpectationKind::RowCountAtLeast,
            Expectation::ForeignKey { .. } => ExpectationKind::ForeignKey,
        }
    }

    /// The column this rule targets, `None` for table-level rules.
    pub fn column(&self) -> Option<&str> {
        match self {
            Expectation::NotNull { column }
            | Expectation::Unique { column }
            | Expectation::ValueInSet { column, .. }
            | Expectation::Range { column, .. }
            | Expectation::ForeignKey { column, .. } => Some(column),
            Expectation::RowCountAtLeast { .. } => None,
        }
    }

    /// `(reference_dataset, reference_column)` for foreign keys.
    pub fn reference(&self) -> Option<(&str, &str)> {
        match self {
            Expectation::ForeignKey {
                reference_dataset,
                reference_column,
                ..
            } => Some((reference_dataset, reference_column)),
            _ => None,
        }
    }

    /// Checks the rule against the schema of the dataset it is bound to.
    ///
    /// The reference side of a foreign key is resolved by the engine, which
    /// is the only place the reference datasets are known.
    pub fn check_schema(&self, schema: &DatasetSchema) -> Result<()> {
        let Some(column) = self.column() else {
            return Ok(());
        };
        let column_type = schema.resolve(column)?;

        if let Expectation::Range { min, max, .. } = self {
            if !column_type.is_numeric() {
                return Err(GuardError::type_mismatch(
                    format!("numeric column for range check on '{column}'"),
                    column_type.as_str(),
                ));
            }
            if min.is_some_and(f64::is_nan) || max.is_some_and(f64::is_nan) {
                return Err(GuardError::Configuration(format!(
                    "range bounds on '{column}' must not be NaN"
                )));
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(GuardError::InvalidRange {
                        column: column.to_string(),
                        min: *min,
                        max: *max,
                    });
                }
            }
        }
        Ok(())
    }
}

fn fmt_bound(bound: Option<f64>) -> String {
    bound.map(|b| b.to_string()).unwrap_or_default()
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match self {
            Expectation::NotNull { column } | Expectation::Unique { column } => {
                write!(f, "{kind}({column})")
            }
            Expectation::ValueInSet { column, allowed } => {
                let allowed = allowed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{kind}({column}, [{allowed}])")
            }
            Expectation::Range { column, min, max } => {
                write!(f, "{kind}({column}, {}..={})", fmt_bound(*min), fmt_bound(*max))
            }
            Expectation::RowCountAtLeast { min } => write!(f, "{kind}({min})"),
            Expectation::ForeignKey {
                column,
                reference_dataset,
                reference_column,
            } => write!(f, "{kind}({column} -> {reference_dataset}.{reference_column})"),
        }
    }
}
