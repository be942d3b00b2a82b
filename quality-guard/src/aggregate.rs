//! Dataset-level and cross-dataset verdicts.
//!
//! Aggregation is a pure pass over already computed [`SuiteReport`]s; no rule
//! is re-evaluated.
//!
//! # Examples
//!
//! ```rust
//! use quality_guard::aggregate::ResultAggregator;
//! use quality_guard::core::{Expectation, ExpectationResult, SuiteReport};
//!
//! let report = SuiteReport::new(
//!     "equipment",
//!     12,
//!     vec![ExpectationResult::from_violations(
//!         Expectation::unique("equipment_id"),
//!         vec![],
//!         vec![],
//!     )],
//! );
//!
//! let summary = ResultAggregator::aggregate(&[report]);
//! assert!(summary.all_suites_success());
//! assert_eq!(summary.get("equipment").unwrap().passed_count, 1);
//! ```

use crate::core::SuiteReport;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pass/total tally for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub dataset_name: String,
    pub passed_count: usize,
    pub total_count: usize,
    pub success: bool,
}

impl DatasetSummary {
    pub fn from_report(report: &SuiteReport) -> Self {
        Self {
            dataset_name: report.dataset_name().to_string(),
            passed_count: report.passed_count(),
            total_count: report.total_count(),
            success: report.overall_success(),
        }
    }

    pub fn failed_count(&self) -> usize {
        self.total_count - self.passed_count
    }

    /// Share of passing rules as a percentage (0.0 to 100.0).
    pub fn success_rate(&self) -> f64 {
        if self.total_count == 0 {
            100.0
        } else {
            (self.passed_count as f64 / self.total_count as f64) * 100.0
        }
    }

    fn merge(&mut self, other: DatasetSummary) {
        self.passed_count += other.passed_count;
        self.total_count += other.total_count;
        self.success &= other.success;
    }
}

/// Per-dataset summaries in input order, plus the combined verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    datasets: Vec<DatasetSummary>,
    all_suites_success: bool,
}

impl AggregateSummary {
    /// Summaries in the order their datasets first appeared.
    pub fn datasets(&self) -> &[DatasetSummary] {
        &self.datasets
    }

    pub fn get(&self, dataset_name: &str) -> Option<&DatasetSummary> {
        self.datasets.iter().find(|d| d.dataset_name == dataset_name)
    }

    /// True when every suite passed (vacuously true for no reports).
    pub fn all_suites_success(&self) -> bool {
        self.all_suites_success
    }

    pub fn failed_datasets(&self) -> impl Iterator<Item = &DatasetSummary> {
        self.datasets.iter().filter(|d| !d.success)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Combines suite reports into an [`AggregateSummary`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    /// Aggregates `reports`, keeping the order in which datasets first appear.
    ///
    /// Several reports for the same dataset name fold into one entry: counts
    /// add up and the entry succeeds only if all of them did.
    pub fn aggregate(reports: &[SuiteReport]) -> AggregateSummary {
        let mut datasets: Vec<DatasetSummary> = Vec::with_capacity(reports.len());
        for report in reports {
            let summary = DatasetSummary::from_report(report);
            match datasets
                .iter_mut()
                .find(|d| d.dataset_name == summary.dataset_name)
            {
                Some(existing) => existing.merge(summary),
                None => datasets.push(summary),
            }
        }

        let all_suites_success = datasets.iter().all(|d| d.success);
        debug!(
            datasets = datasets.len(),
            all_suites_success, "Aggregated suite reports"
        );
        AggregateSummary {
            datasets,
            all_suites_success,
        }
    }
}
