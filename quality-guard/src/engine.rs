//! The validation engine.
//!
//! [`ValidationEngine::evaluate`] runs one [`ExpectationSuite`] against one
//! [`Dataset`]. Before any rule runs, the suite is checked against the
//! dataset: its name, every column it references, and the reference side of
//! every foreign key. Any problem there is a configuration error and nothing
//! is evaluated. Past that point every rule is evaluated and failures are
//! reported as results, never as errors.
//!
//! # Examples
//!
//! ```rust
//! use quality_guard::prelude::*;
//! use quality_guard::core::{ColumnType, Dataset, DatasetRegistry, ExpectationSuite, Value};
//!
//! let equipment = Dataset::builder("equipment")
//!     .column("equipment_id", ColumnType::Text, ["E1", "E2"])
//!     .build()?;
//! let readings = Dataset::builder("sensor_readings")
//!     .column("reading_id", ColumnType::Integer, [1, 2, 3])
//!     .column("equipment_id", ColumnType::Text, [Some("E1"), None, Some("E3")])
//!     .build()?;
//!
//! let suite = ExpectationSuite::builder("sensor_readings")
//!     .primary_key("reading_id")
//!     .foreign_key("equipment_id", "equipment", "equipment_id")
//!     .build(readings.schema())?;
//!
//! let references = DatasetRegistry::new().with_dataset(equipment);
//! let report = ValidationEngine::new().evaluate(&suite, &readings, &references)?;
//!
//! assert!(!report.overall_success());
//! let fk = report.result_for(2).unwrap();
//! assert_eq!(fk.violating_rows(), &[2]);
//! assert_eq!(fk.sample_violating_values(), &[Value::from("E3")]);
//! # Ok::<(), GuardError>(())
//! ```

use crate::config::EngineConfig;
use crate::core::{Dataset, DatasetRegistry, ExpectationSuite, SuiteReport};
use crate::logging::truncate_field;
use crate::prelude::*;
use crate::{log_expectation, rules};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn, Level};

/// Evaluates expectation suites against datasets.
///
/// The engine holds only configuration; it keeps no reference to any dataset
/// beyond a single call and is cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: EngineConfig,
}

impl ValidationEngine {
    /// Creates an engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates `suite` against `dataset`, resolving foreign keys through `references`.
    ///
    /// Results follow suite order. Evaluating the same suite against the same
    /// dataset always yields an identical report.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, before evaluating any rule, when the
    /// dataset name differs from the suite's, a column cannot be resolved,
    /// a range is malformed, or a foreign key's reference dataset or column
    /// is missing.
    #[instrument(skip_all, fields(
        suite.dataset = %suite.dataset_name(),
        suite.expectations = suite.len(),
        dataset.rows = dataset.row_count()
    ))]
    pub fn evaluate(
        &self,
        suite: &ExpectationSuite,
        dataset: &Dataset,
        references: &DatasetRegistry,
    ) -> Result<SuiteReport> {
        let start = Instant::now();
        self.preflight(suite, dataset, references)?;

        let mut results = Vec::with_capacity(suite.len());
        for (index, expectation) in suite.expectations().iter().enumerate() {
            let result = rules::evaluate(expectation, dataset, references, self.config.sample_limit)
                .map_err(|e| GuardError::invalid_expectation(index, expectation.to_string(), e))?;

            if result.success() {
                log_expectation!(
                    self.config.log,
                    expectation.index = index,
                    expectation.kind = %result.kind(),
                    expectation.column = ?result.column(),
                    "Expectation passed"
                );
            } else if self.config.log.enabled(Level::WARN) {
                let samples = result
                    .sample_violating_values()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(
                    suite.dataset = %suite.dataset_name(),
                    expectation.index = index,
                    expectation.kind = %result.kind(),
                    expectation.column = ?result.column(),
                    violations.count = result.violating_row_count(),
                    violations.sample = %truncate_field(&samples, self.config.log.max_field_length),
                    "Expectation failed"
                );
            }
            results.push(result);
        }

        let report = SuiteReport::new(suite.dataset_name(), dataset.row_count(), results);
        if self.config.log.enabled(Level::INFO) {
            info!(
                suite.dataset = %report.dataset_name(),
                results.passed = report.passed_count(),
                results.failed = report.failed_count(),
                results.total = report.total_count(),
                duration_ms = start.elapsed().as_millis() as u64,
                suite.result = %if report.overall_success() { "passed" } else { "failed" },
                "Expectation suite evaluated"
            );
        }
        Ok(report)
    }

    /// Evaluates many suites concurrently.
    ///
    /// Each suite runs against the dataset in `registry` named by its
    /// `dataset_name`, with the whole registry available for foreign keys.
    /// At most `max_parallelism` suites run at once on tokio's blocking pool.
    /// Reports come back in the order of `suites`, whatever order they finish in.
    ///
    /// # Errors
    ///
    /// Fails with the first configuration error in input order, including
    /// [`GuardError::MissingDataset`] for a suite whose dataset is not registered.
    #[instrument(skip_all, fields(suites = suites.len(), datasets = registry.len()))]
    pub async fn evaluate_all(
        &self,
        suites: Vec<Arc<ExpectationSuite>>,
        registry: Arc<DatasetRegistry>,
    ) -> Result<Vec<SuiteReport>> {
        let parallelism = self.config.max_parallelism.max(1);
        debug!(parallelism, "Scheduling suite evaluations");

        let tasks = suites.into_iter().map(|suite| {
            let engine = self.clone();
            let registry = Arc::clone(&registry);
            async move {
                let handle = tokio::task::spawn_blocking(move || -> Result<SuiteReport> {
                    let dataset = registry.get_arc(suite.dataset_name()).ok_or_else(|| {
                        GuardError::MissingDataset {
                            name: suite.dataset_name().to_string(),
                        }
                    })?;
                    engine.evaluate(&suite, &dataset, &registry)
                });
                match handle.await {
                    Ok(result) => result,
                    Err(e) => Err(GuardError::Internal(format!(
                        "suite evaluation task failed: {e}"
                    ))),
                }
            }
        });

        stream::iter(tasks).buffered(parallelism).try_collect().await
    }

    fn preflight(
        &self,
        suite: &ExpectationSuite,
        dataset: &Dataset,
        references: &DatasetRegistry,
    ) -> Result<()> {
        if suite.dataset_name() != dataset.name() {
            return Err(GuardError::DatasetMismatch {
                expected: suite.dataset_name().to_string(),
                found: dataset.name().to_string(),
            });
        }
        suite.check_schema(dataset.schema())?;

        for (index, expectation) in suite.foreign_keys() {
            let Some((reference_dataset, reference_column)) = expectation.reference() else {
                continue;
            };
            let resolved = references
                .get(reference_dataset)
                .ok_or_else(|| GuardError::MissingReference {
                    dataset: reference_dataset.to_string(),
                })
                .and_then(|reference| reference.schema().resolve(reference_column).map(|_| ()));
            if let Err(e) = resolved {
                return Err(GuardError::invalid_expectation(
                    index,
                    expectation.to_string(),
                    e,
                ));
            }
        }
        Ok(())
    }
}
