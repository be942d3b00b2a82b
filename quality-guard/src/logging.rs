//! Logging utilities and configuration for quality-guard.
//!
//! The engine logs through `tracing`. [`LogConfig`] controls how chatty the
//! engine itself is, while [`setup`] installs a `tracing-subscriber` for
//! binaries and tests that want output.

use tracing::Level;

/// Logging configuration for the validation engine.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Most verbose level the engine emits; quieter events still pass
    pub base_level: Level,
    /// Whether to log every expectation outcome, not only failures
    pub log_expectation_details: bool,
    /// Whether to log dataset construction and corruption operations
    pub log_data_operations: bool,
    /// Maximum length for logged field values (to prevent huge logs)
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_expectation_details: false,
            log_data_operations: true,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_expectation_details: true,
            log_data_operations: true,
            max_field_length: 1024,
        }
    }

    /// Creates a minimal configuration with the lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_expectation_details: false,
            log_data_operations: false,
            max_field_length: 128,
        }
    }

    /// Returns true if events at `level` pass `base_level`.
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.base_level
    }
}

/// Macro for conditional per-expectation logging.
#[macro_export]
macro_rules! log_expectation {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_expectation_details && $config.enabled(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}

/// Macro for conditional data operation logging.
#[macro_export]
macro_rules! log_data_op {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_data_operations && $config.enabled(tracing::Level::INFO) {
            tracing::info!($($arg)*);
        }
    };
}

/// Truncates a string to the maximum field length if needed.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    match value.char_indices().nth(max_length) {
        None => value.to_string(),
        Some((cut, _)) => format!("{}...(truncated)", &value[..cut]),
    }
}

/// Utilities for installing a `tracing-subscriber`.
pub mod setup {
    use tracing::Level;

    /// Configuration for the logging setup.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for the application
        pub level: Level,
        /// Log level for quality-guard components specifically
        pub guard_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                guard_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Creates a configuration for production use.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                guard_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        /// Creates a configuration for development use.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                guard_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        /// Sets the log level for the application.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the log level for quality-guard components.
        pub fn with_guard_level(mut self, level: Level) -> Self {
            self.guard_level = level;
            self
        }

        /// Sets whether to use JSON output format.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            if let Some(ref filter) = self.env_filter {
                filter.clone()
            } else {
                format!(
                    "{},quality_guard={}",
                    self.level.as_str().to_lowercase(),
                    self.guard_level.as_str().to_lowercase()
                )
            }
        }
    }

    /// Installs a global subscriber. `RUST_LOG` wins over the configured filter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use quality_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}
