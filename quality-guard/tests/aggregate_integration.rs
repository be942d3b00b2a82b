//! End-to-end runs over all four mining tables, aggregated and formatted.

use std::sync::Arc;

use quality_guard::aggregate::ResultAggregator;
use quality_guard::catalog::{self, EQUIPMENT, ORE_PRODUCTION};
use quality_guard::core::DatasetRegistry;
use quality_guard::corruption::CorruptionHarness;
use quality_guard::engine::ValidationEngine;
use quality_guard::formatters::{FormatterConfig, JsonFormatter, ResultFormatter};
use quality_guard::fixtures;

async fn run_all(registry: DatasetRegistry) -> Vec<quality_guard::core::SuiteReport> {
    let suites = catalog::standard_suites(&registry)
        .unwrap()
        .into_iter()
        .map(Arc::new)
        .collect();
    ValidationEngine::new()
        .evaluate_all(suites, Arc::new(registry))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_clean_plant_passes() {
    let reports = run_all(fixtures::registry().unwrap()).await;
    let summary = ResultAggregator::aggregate(&reports);

    assert!(summary.all_suites_success());
    assert_eq!(summary.len(), 4);
    assert_eq!(summary.failed_datasets().count(), 0);
    assert_eq!(summary.get(EQUIPMENT).unwrap().total_count, 10);
}

#[tokio::test]
async fn test_one_dirty_table_fails_plant() {
    let mut registry = fixtures::registry().unwrap();
    let clean = registry.get(ORE_PRODUCTION).unwrap().clone();
    let dirty = CorruptionHarness::corrupt(&clean, &catalog::ore_production_corruption())
        .unwrap()
        .into_dataset();
    registry.insert(dirty);

    let reports = run_all(registry).await;
    let summary = ResultAggregator::aggregate(&reports);

    assert!(!summary.all_suites_success());
    let failed: Vec<&str> = summary
        .failed_datasets()
        .map(|d| d.dataset_name.as_str())
        .collect();
    assert_eq!(failed, vec![ORE_PRODUCTION]);

    let ore = summary.get(ORE_PRODUCTION).unwrap();
    assert_eq!((ore.passed_count, ore.total_count), (6, 11));
    assert!(summary.get(EQUIPMENT).unwrap().success);

    let json = JsonFormatter::with_config(FormatterConfig::failures_only())
        .format_summary(&summary)
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["all_suites_success"], false);
    assert_eq!(parsed["datasets"][2]["dataset_name"], ORE_PRODUCTION);

    let json = JsonFormatter::with_config(FormatterConfig::failures_only())
        .format_reports(&reports)
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[2]["results"].as_array().unwrap().len(), 5);
    assert_eq!(parsed[0]["results"].as_array().unwrap().len(), 0);
}
