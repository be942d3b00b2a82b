//! Core data model of the validation engine.
//!
//! ## Overview
//!
//! - **[`Dataset`]**: an immutable, named Arrow table handed in by a loader
//! - **[`Expectation`]**: a single declarative rule (not null, unique, value
//!   set, range, row count, foreign key)
//! - **[`ExpectationSuite`]**: an ordered list of expectations bound to one dataset
//! - **[`ExpectationResult`]** / **[`SuiteReport`]**: what the engine produces
//! - **[`DatasetRegistry`]**: named datasets used to resolve foreign keys
//!
//! ## Architecture
//!
//! ```text
//! DatasetRegistry
//!     ├── equipment        ◄──────────────┐
//!     └── sensor_readings                 │ foreign_key(equipment_id)
//!                                         │
//! ExpectationSuite (sensor_readings) ─────┘
//!     ├── not_null(reading_id)
//!     ├── unique(reading_id)
//!     └── row_count_at_least(40)
//! ```

mod dataset;
mod expectation;
mod registry;
mod result;
mod suite;
mod value;

pub use dataset::{Column, ColumnSchema, ColumnType, Dataset, DatasetBuilder, DatasetSchema};
pub use expectation::{Expectation, ExpectationKind};
pub use registry::DatasetRegistry;
pub use result::{ExpectationResult, SuiteReport};
pub use suite::{ExpectationSuite, ExpectationSuiteBuilder};
pub use value::Value;

pub(crate) use value::ValueKey;
