//! Engine configuration.

use crate::logging::LogConfig;

/// Number of violating values kept per result unless configured otherwise.
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// Configuration for a [`ValidationEngine`](crate::engine::ValidationEngine).
///
/// # Examples
///
/// ```rust
/// use quality_guard::config::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_sample_limit(10)
///     .with_max_parallelism(2);
///
/// assert_eq!(config.sample_limit, 10);
/// assert_eq!(config.max_parallelism, 2);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of violating values sampled per result
    pub sample_limit: usize,
    /// Maximum number of suites evaluated concurrently by `evaluate_all`
    pub max_parallelism: usize,
    /// Logging behaviour of the engine
    pub log: LogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            max_parallelism: num_cpus::get(),
            log: LogConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Evaluates one suite at a time.
    pub fn sequential() -> Self {
        Self {
            max_parallelism: 1,
            ..Self::default()
        }
    }

    /// Logs every expectation outcome.
    pub fn verbose() -> Self {
        Self {
            log: LogConfig::verbose(),
            ..Self::default()
        }
    }

    pub fn with_sample_limit(mut self, sample_limit: usize) -> Self {
        self.sample_limit = sample_limit;
        self
    }

    /// Sets the concurrency bound; values below one are treated as one.
    pub fn with_max_parallelism(mut self, max_parallelism: usize) -> Self {
        self.max_parallelism = max_parallelism.max(1);
        self
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_limit, 5);
        assert!(config.max_parallelism >= 1);
        assert!(!config.log.log_expectation_details);
    }

    #[test]
    fn test_presets() {
        assert_eq!(EngineConfig::sequential().max_parallelism, 1);
        assert!(EngineConfig::verbose().log.log_expectation_details);
        assert_eq!(EngineConfig::default().with_max_parallelism(0).max_parallelism, 1);
    }
}
