//! Hand-authored suites for the mining-plant tables.
//!
//! Each suite builder takes the schema of the dataset it will run against and
//! validates its rules there, so a renamed or retyped column fails at build
//! time instead of during evaluation.
//!
//! # Examples
//!
//! ```rust
//! use quality_guard::catalog;
//! use quality_guard::engine::ValidationEngine;
//! use quality_guard::fixtures;
//!
//! let registry = fixtures::registry()?;
//! let equipment = registry.get(catalog::EQUIPMENT).unwrap();
//! let suite = catalog::equipment_suite(equipment.schema())?;
//!
//! let report = ValidationEngine::new().evaluate(&suite, equipment, &registry)?;
//! assert!(report.overall_success());
//! # Ok::<(), quality_guard::error::GuardError>(())
//! ```

use crate::core::{DatasetRegistry, DatasetSchema, ExpectationSuite};
use crate::corruption::CorruptionSpec;
use crate::prelude::*;

pub const EQUIPMENT: &str = "equipment";
pub const SENSOR_READINGS: &str = "sensor_readings";
pub const ORE_PRODUCTION: &str = "ore_production";
pub const DOWNTIME_EVENTS: &str = "downtime_events";

/// Dataset names in the order their suites are run.
pub const DATASETS: [&str; 4] = [EQUIPMENT, SENSOR_READINGS, ORE_PRODUCTION, DOWNTIME_EVENTS];

pub const MINE_IDS: [&str; 2] = ["MINE-1", "MINE-2"];
pub const EQUIPMENT_STATUSES: [&str; 3] = ["В работе", "На ТО", "Простой"];
pub const QUALITY_FLAGS: [&str; 3] = ["OK", "WARN", "ALARM"];
pub const SHIFTS: [i64; 2] = [1, 2];
pub const PRODUCTION_STATUSES: [&str; 2] = ["Завершена", "Прервана"];
pub const SEVERITIES: [&str; 5] = ["Низкая", "Средняя", "Высокая", "Критическая", "Плановое"];
pub const EVENT_TYPES: [&str; 2] = ["Незапланированный", "Плановое ТО"];

pub fn equipment_suite(schema: &DatasetSchema) -> Result<ExpectationSuite> {
    ExpectationSuite::builder(EQUIPMENT)
        .description("Mining equipment register")
        .primary_key("equipment_id")
        .not_null("equipment_name")
        .not_null("mine_id")
        .in_set("mine_id", MINE_IDS)
        .in_set("status", EQUIPMENT_STATUSES)
        .between("year_manufactured", 2010.0, 2026.0)
        .at_least("engine_hours", 0.0)
        .between("max_payload_tons", 0.0, 100.0)
        .row_count_at_least(10)
        .build(schema)
}

/// Telemetry suite; its foreign key needs the equipment table at evaluation time.
pub fn sensor_readings_suite(schema: &DatasetSchema) -> Result<ExpectationSuite> {
    ExpectationSuite::builder(SENSOR_READINGS)
        .description("Equipment sensor telemetry")
        .primary_key("reading_id")
        .not_null("equipment_id")
        .not_null("sensor_type")
        .not_null("reading_timestamp")
        .in_set("quality_flag", QUALITY_FLAGS)
        .at_least("reading_value", 0.0)
        .foreign_key("equipment_id", EQUIPMENT, "equipment_id")
        .row_count_at_least(40)
        .build(schema)
}

pub fn ore_production_suite(schema: &DatasetSchema) -> Result<ExpectationSuite> {
    ExpectationSuite::builder(ORE_PRODUCTION)
        .description("Per-shift ore extraction")
        .primary_key("production_id")
        .not_null("mine_id")
        .not_null("equipment_id")
        .not_null("production_date")
        .in_set("shift", SHIFTS)
        .in_set("status", PRODUCTION_STATUSES)
        .between("tonnage_extracted", 0.0, 500.0)
        .between("fe_content_pct", 0.0, 100.0)
        .between("moisture_pct", 0.0, 100.0)
        .row_count_at_least(10)
        .build(schema)
}

pub fn downtime_events_suite(schema: &DatasetSchema) -> Result<ExpectationSuite> {
    ExpectationSuite::builder(DOWNTIME_EVENTS)
        .description("Equipment downtime log")
        .primary_key("event_id")
        .not_null("equipment_id")
        .not_null("event_type")
        .in_set("severity", SEVERITIES)
        .in_set("event_type", EVENT_TYPES)
        .between("duration_minutes", 1.0, 1440.0)
        .row_count_at_least(5)
        .build(schema)
}

/// Builds the suite registered for `dataset_name`.
pub fn suite_for(dataset_name: &str, schema: &DatasetSchema) -> Result<ExpectationSuite> {
    match dataset_name {
        EQUIPMENT => equipment_suite(schema),
        SENSOR_READINGS => sensor_readings_suite(schema),
        ORE_PRODUCTION => ore_production_suite(schema),
        DOWNTIME_EVENTS => downtime_events_suite(schema),
        other => Err(GuardError::MissingDataset {
            name: other.to_string(),
        }),
    }
}

/// All four suites, built against the schemas found in `registry`.
///
/// Fails with [`GuardError::MissingDataset`] when one of the tables is absent.
pub fn standard_suites(registry: &DatasetRegistry) -> Result<Vec<ExpectationSuite>> {
    DATASETS
        .iter()
        .map(|&name| {
            let dataset = registry.get(name).ok_or_else(|| GuardError::MissingDataset {
                name: name.to_string(),
            })?;
            suite_for(name, dataset.schema())
        })
        .collect()
}

/// The standard dirty-data scenario for `ore_production`.
///
/// Targets, in order: `mine_id` not null (row 0), `production_id` unique
/// (row 1 and the appended copy), `fe_content_pct` range (row 2),
/// `tonnage_extracted` range (row 3) and `status` value set (row 4).
pub fn ore_production_corruption() -> CorruptionSpec {
    CorruptionSpec::new()
        .null_out("null mine_id", "mine_id", 0)
        .duplicate_key("duplicate production_id", "production_id", 1)
        .out_of_range("fe_content_pct above 100", "fe_content_pct", 2, 150.0)
        .negative("negative tonnage", "tonnage_extracted", 3, -10.0)
        .invalid_category("unknown status", "status", 4, "Неизвестно")
}
