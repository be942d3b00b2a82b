//! Global subscriber installation. Kept in its own test binary since a
//! global subscriber can only be set once per process.

use quality_guard::logging::setup::{init_logging, LoggingConfig};

#[test]
fn test_init_logging_installs_once() {
    let config = LoggingConfig::production().with_env_filter("quality_guard=info");
    assert!(init_logging(config.clone()).is_ok());
    assert!(init_logging(config).is_err());

    tracing::info!(target: "quality_guard", "logging installed");
}
