//! Error types for the quality-guard validation engine.
//!
//! Errors in this crate are structural problems: a suite that references a
//! column the dataset does not have, a foreign key pointing at a dataset that
//! was never supplied, a corruption spec that cannot be applied. Data-quality
//! failures are *not* errors; they are reported as unsuccessful
//! [`ExpectationResult`](crate::core::ExpectationResult)s.

use thiserror::Error;

/// The main error type for the quality-guard crate.
#[derive(Error, Debug)]
pub enum GuardError {
    /// A column referenced by a rule or defect does not exist.
    #[error("Column '{column}' not found in dataset '{dataset}'")]
    ColumnNotFound {
        /// Dataset that was searched
        dataset: String,
        /// Column that could not be resolved
        column: String,
    },

    /// Two columns of one dataset share a name.
    #[error("Duplicate column '{column}' in dataset '{dataset}'")]
    DuplicateColumn { dataset: String, column: String },

    /// A foreign key names a reference dataset that was not supplied.
    #[error("Reference dataset '{dataset}' was not provided")]
    MissingReference { dataset: String },

    /// A suite was scheduled for a dataset the registry does not hold.
    #[error("Dataset '{name}' is not registered")]
    MissingDataset { name: String },

    /// A suite was evaluated against a dataset it is not bound to.
    #[error("Suite is bound to dataset '{expected}' but was evaluated against '{found}'")]
    DatasetMismatch { expected: String, found: String },

    /// A range rule whose lower bound exceeds its upper bound.
    #[error("Invalid range on column '{column}': min {min} is greater than max {max}")]
    InvalidRange { column: String, min: f64, max: f64 },

    /// Value or column types do not line up.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// An Arrow column type the engine does not understand.
    #[error("Unsupported type for column '{column}': {data_type}")]
    UnsupportedType { column: String, data_type: String },

    /// A rule of a suite failed its configuration check.
    #[error("Invalid expectation #{index} ({rule}): {source}")]
    InvalidExpectation {
        /// Position of the rule within its suite
        index: usize,
        /// Rendered rule, e.g. `not_null(mine_id)`
        rule: String,
        /// What was wrong with it
        #[source]
        source: Box<GuardError>,
    },

    /// A defect injector that cannot be applied to the clean dataset.
    #[error("Invalid defect '{name}': {message}")]
    InvalidDefect { name: String, message: String },

    /// Generic configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from serialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unexpected internal condition.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, GuardError>`.
pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    /// Wraps an error with the suite position and rendering of the rule it belongs to.
    pub fn invalid_expectation(index: usize, rule: impl Into<String>, source: GuardError) -> Self {
        Self::InvalidExpectation {
            index,
            rule: rule.into(),
            source: Box::new(source),
        }
    }

    /// Creates an invalid defect error.
    pub fn invalid_defect(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefect {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Returns true if this error stems from how a suite, dataset or
    /// corruption spec was put together rather than from the runtime.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            GuardError::Arrow(_) | GuardError::Serialization(_) | GuardError::Internal(_)
        )
    }

    /// Returns the suite position of the offending rule, if known.
    pub fn rule_index(&self) -> Option<usize> {
        match self {
            GuardError::InvalidExpectation { index, .. } => Some(*index),
            _ => None,
        }
    }
}
