//! # quality-guard - Declarative data-quality validation
//!
//! quality-guard evaluates declarative expectations (not null, unique, value
//! sets, numeric ranges, row counts and cross-dataset foreign keys) against
//! in-memory Arrow tables and reports, for every rule, whether it held and
//! exactly which rows broke it.
//!
//! ## Quick Start
//!
//! ```rust
//! use quality_guard::prelude::*;
//! use quality_guard::core::{ColumnType, Dataset, DatasetRegistry, ExpectationSuite};
//!
//! # fn main() -> Result<()> {
//! let dataset = Dataset::builder("ore_production")
//!     .column("production_id", ColumnType::Integer, [1, 2, 2])
//!     .column("fe_content_pct", ColumnType::Float, [61.5, 150.0, 58.0])
//!     .build()?;
//!
//! let suite = ExpectationSuite::builder("ore_production")
//!     .primary_key("production_id")
//!     .between("fe_content_pct", 0.0, 100.0)
//!     .build(dataset.schema())?;
//!
//! let report = ValidationEngine::new().evaluate(&suite, &dataset, &DatasetRegistry::new())?;
//! assert!(!report.overall_success());
//! assert_eq!(report.results()[1].violating_rows(), &[1, 2]);
//! assert_eq!(report.results()[2].violating_rows(), &[1]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Features
//!
//! - **Fail-fast configuration**: a suite referencing a missing column, a
//!   non-numeric range column or an unknown reference dataset is rejected
//!   before any data is scanned
//! - **Row-exact results**: every violating row index is reported, along with
//!   a bounded sample of offending values
//! - **Batch evaluation**: [`engine::ValidationEngine::evaluate_all`] runs many
//!   suites concurrently over a shared [`core::DatasetRegistry`]
//! - **Corruption harness**: [`corruption`] injects known defects into a clean
//!   dataset to check that a suite catches them
//!
//! ## Architecture
//!
//! - **`core`**: datasets, expectations, suites, results and the registry
//! - **`engine`**: the validation engine
//! - **`aggregate`**: per-dataset and combined verdicts
//! - **`corruption`**: synthetic defect injection
//! - **`catalog`** / **`fixtures`**: the mining-plant suites and sample tables
//! - **`formatters`**: JSON output
//! - **`logging`** / **`config`** / **`error`**: ambient plumbing

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod core;
pub mod corruption;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod formatters;
pub mod logging;
pub mod prelude;

mod rules;
