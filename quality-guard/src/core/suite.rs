//! Expectation suites: ordered rule sets bound to one dataset.

use super::dataset::DatasetSchema;
use super::expectation::Expectation;
use super::value::Value;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An ordered collection of [`Expectation`]s bound to one dataset name.
///
/// Suites are validated against a [`DatasetSchema`] when built, so a rule
/// naming a column that does not exist never reaches evaluation. A suite can
/// be reused for every dataset snapshot of the same shape.
///
/// # Examples
///
/// ```rust
/// use quality_guard::core::{ColumnType, Dataset, ExpectationSuite};
///
/// let downtime = Dataset::builder("downtime_events")
///     .column("event_id", ColumnType::Integer, [1, 2, 3])
///     .column("duration_minutes", ColumnType::Integer, [45, 120, 30])
///     .build()
///     .unwrap();
///
/// let suite = ExpectationSuite::builder("downtime_events")
///     .primary_key("event_id")
///     .between("duration_minutes", 1.0, 1440.0)
///     .row_count_at_least(1)
///     .build(downtime.schema())
///     .unwrap();
///
/// assert_eq!(suite.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSuite {
    dataset_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    expectations: Vec<Expectation>,
}

impl ExpectationSuite {
    pub fn builder(dataset_name: impl Into<String>) -> ExpectationSuiteBuilder {
        ExpectationSuiteBuilder::new(dataset_name)
    }

    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    pub fn len(&self) -> usize {
        self.expectations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Foreign-key rules with their suite positions.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (usize, &Expectation)> {
        self.expectations
            .iter()
            .enumerate()
            .filter(|(_, expectation)| expectation.reference().is_some())
    }

    /// Validates every rule against `schema`, reporting the first offender.
    pub fn check_schema(&self, schema: &DatasetSchema) -> Result<()> {
        for (index, expectation) in self.expectations.iter().enumerate() {
            expectation
                .check_schema(schema)
                .map_err(|e| GuardError::invalid_expectation(index, expectation.to_string(), e))?;
        }
        Ok(())
    }
}

/// Builder for [`ExpectationSuite`].
#[derive(Debug, Clone)]
pub struct ExpectationSuiteBuilder {
    dataset_name: String,
    description: Option<String>,
    expectations: Vec<Expectation>,
}

impl ExpectationSuiteBuilder {
    pub fn new(dataset_name: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            description: None,
            expectations: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a rule.
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Appends several rules in order.
    pub fn expectations(mut self, expectations: impl IntoIterator<Item = Expectation>) -> Self {
        self.expectations.extend(expectations);
        self
    }

    pub fn not_null(self, column: impl Into<String>) -> Self {
        self.expect(Expectation::not_null(column))
    }

    pub fn unique(self, column: impl Into<String>) -> Self {
        self.expect(Expectation::unique(column))
    }

    /// Shorthand for `not_null` followed by `unique` on the same column.
    pub fn primary_key(self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.not_null(column.clone()).unique(column)
    }

    pub fn in_set<I, V>(self, column: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.expect(Expectation::in_set(column, allowed))
    }

    pub fn between(self, column: impl Into<String>, min: f64, max: f64) -> Self {
        self.expect(Expectation::between(column, min, max))
    }

    pub fn at_least(self, column: impl Into<String>, min: f64) -> Self {
        self.expect(Expectation::at_least(column, min))
    }

    pub fn at_most(self, column: impl Into<String>, max: f64) -> Self {
        self.expect(Expectation::at_most(column, max))
    }

    pub fn row_count_at_least(self, min: usize) -> Self {
        self.expect(Expectation::row_count_at_least(min))
    }

    pub fn foreign_key(
        self,
        column: impl Into<String>,
        reference_dataset: impl Into<String>,
        reference_column: impl Into<String>,
    ) -> Self {
        self.expect(Expectation::foreign_key(
            column,
            reference_dataset,
            reference_column,
        ))
    }

    /// Builds the suite, failing fast on any rule that does not fit `schema`.
    pub fn build(self, schema: &DatasetSchema) -> Result<ExpectationSuite> {
        if schema.dataset_name() != self.dataset_name {
            return Err(GuardError::DatasetMismatch {
                expected: self.dataset_name,
                found: schema.dataset_name().to_string(),
            });
        }

        let suite = ExpectationSuite {
            dataset_name: self.dataset_name,
            description: self.description,
            expectations: self.expectations,
        };
        suite.check_schema(schema)?;

        debug!(
            suite.dataset = %suite.dataset_name,
            suite.expectations = suite.expectations.len(),
            "Built expectation suite"
        );
        Ok(suite)
    }
}
