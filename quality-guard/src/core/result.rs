//! Validation result types.

use super::expectation::{Expectation, ExpectationKind};
use super::value::Value;
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one [`Expectation`].
///
/// For row-level rules `success` holds exactly when no row violates the rule.
/// `violating_rows` lists every offending row in ascending order, while
/// `sample_violating_values` keeps only the first few of their values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationResult {
    expectation: Expectation,
    kind: ExpectationKind,
    success: bool,
    violating_row_count: usize,
    violating_rows: Vec<usize>,
    sample_violating_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    observed_row_count: Option<usize>,
}

impl ExpectationResult {
    /// Result of a row-level rule.
    ///
    /// `rows` must be sorted ascending; `samples` are the values of the first
    /// rows, already capped by the caller.
    pub fn from_violations(
        expectation: Expectation,
        rows: Vec<usize>,
        samples: Vec<Value>,
    ) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(samples.len() <= rows.len());
        Self {
            kind: expectation.kind(),
            expectation,
            success: rows.is_empty(),
            violating_row_count: rows.len(),
            violating_rows: rows,
            sample_violating_values: samples,
            observed_row_count: None,
        }
    }

    /// Result of a table-level rule such as a row-count bound.
    pub fn table_level(expectation: Expectation, success: bool, observed_row_count: usize) -> Self {
        Self {
            kind: expectation.kind(),
            expectation,
            success,
            violating_row_count: 0,
            violating_rows: Vec::new(),
            sample_violating_values: Vec::new(),
            observed_row_count: Some(observed_row_count),
        }
    }

    pub fn expectation(&self) -> &Expectation {
        &self.expectation
    }

    pub fn kind(&self) -> ExpectationKind {
        self.kind
    }

    pub fn column(&self) -> Option<&str> {
        self.expectation.column()
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn violating_row_count(&self) -> usize {
        self.violating_row_count
    }

    pub fn violating_rows(&self) -> &[usize] {
        &self.violating_rows
    }

    pub fn sample_violating_values(&self) -> &[Value] {
        &self.sample_violating_values
    }

    /// Row count seen by table-level rules.
    pub fn observed_row_count(&self) -> Option<usize> {
        self.observed_row_count
    }
}

/// Results of one suite against one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    dataset_name: String,
    row_count: usize,
    results: Vec<ExpectationResult>,
    overall_success: bool,
}

impl SuiteReport {
    /// Creates a report; the overall verdict is the AND of all results.
    pub fn new(
        dataset_name: impl Into<String>,
        row_count: usize,
        results: Vec<ExpectationResult>,
    ) -> Self {
        let overall_success = results.iter().all(ExpectationResult::success);
        Self {
            dataset_name: dataset_name.into(),
            row_count,
            results,
            overall_success,
        }
    }

    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    /// Row count of the dataset the suite ran against.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Results in suite order.
    pub fn results(&self) -> &[ExpectationResult] {
        &self.results
    }

    pub fn overall_success(&self) -> bool {
        self.overall_success
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.total_count() - self.passed_count()
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &ExpectationResult> {
        self.results.iter().filter(|r| !r.success())
    }

    /// Result at a suite position.
    pub fn result_for(&self, index: usize) -> Option<&ExpectationResult> {
        self.results.get(index)
    }

    /// Results of every rule targeting `column`.
    pub fn results_for_column<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a ExpectationResult> + 'a {
        self.results
            .iter()
            .filter(move |r| r.column() == Some(column))
    }
}
