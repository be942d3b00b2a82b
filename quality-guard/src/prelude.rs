//! Prelude for commonly used types and traits in quality-guard.

pub use crate::aggregate::{AggregateSummary, ResultAggregator};
pub use crate::config::EngineConfig;
pub use crate::engine::ValidationEngine;
pub use crate::error::{GuardError, Result};
pub use crate::formatters::{FormatterConfig, JsonFormatter, ResultFormatter};
pub use crate::logging::LogConfig;
