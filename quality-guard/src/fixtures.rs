//! Deterministic sample datasets for the mining-plant tables.
//!
//! Every dataset produced here passes its suite from [`crate::catalog`], so
//! tests and benchmarks can start from known-clean data and corrupt it on
//! purpose. Row counts scale through the `*_with_rows` variants; foreign keys
//! in the child tables always point at existing equipment.

use crate::catalog::{DOWNTIME_EVENTS, EQUIPMENT, ORE_PRODUCTION, SENSOR_READINGS};
use crate::core::{ColumnType, Dataset, DatasetRegistry};
use crate::prelude::*;
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub const EQUIPMENT_ROWS: usize = 12;
pub const SENSOR_READING_ROWS: usize = 48;
pub const ORE_PRODUCTION_ROWS: usize = 14;
pub const DOWNTIME_EVENT_ROWS: usize = 8;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const EQUIPMENT_TYPES: [&str; 3] = ["Самосвал", "Экскаватор", "Буровая установка"];
const SENSOR_TYPES: [(&str, &str); 4] = [
    ("Температура двигателя", "°C"),
    ("Давление масла", "бар"),
    ("Вибрация", "мм/с"),
    ("Уровень топлива", "%"),
];
const FAILURE_SEVERITIES: [&str; 4] = ["Низкая", "Средняя", "Высокая", "Критическая"];

fn base_date() -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .ok_or_else(|| GuardError::Internal("invalid fixture base date".to_string()))
}

fn base_time() -> Result<NaiveDateTime> {
    base_date()?
        .and_hms_opt(6, 0, 0)
        .ok_or_else(|| GuardError::Internal("invalid fixture base time".to_string()))
}

fn equipment_id(index: usize) -> String {
    format!("EQ-{:03}", index + 1)
}

fn mine_id(index: usize) -> &'static str {
    if index % 2 == 0 {
        "MINE-1"
    } else {
        "MINE-2"
    }
}

/// The equipment table with [`EQUIPMENT_ROWS`] rows.
pub fn equipment() -> Result<Dataset> {
    equipment_with_rows(EQUIPMENT_ROWS)
}

pub fn equipment_with_rows(rows: usize) -> Result<Dataset> {
    let statuses = ["В работе", "На ТО", "Простой"];
    Dataset::builder(EQUIPMENT)
        .column("equipment_id", ColumnType::Text, (0..rows).map(equipment_id))
        .column(
            "equipment_name",
            ColumnType::Text,
            (0..rows).map(|i| format!("{} №{}", EQUIPMENT_TYPES[i % 3], i + 1)),
        )
        .column(
            "equipment_type",
            ColumnType::Text,
            (0..rows).map(|i| EQUIPMENT_TYPES[i % 3]),
        )
        .column("mine_id", ColumnType::Text, (0..rows).map(mine_id))
        .column("status", ColumnType::Text, (0..rows).map(|i| statuses[i % 3]))
        .column(
            "year_manufactured",
            ColumnType::Integer,
            (0..rows).map(|i| 2010 + (i % 17) as i64),
        )
        .column(
            "engine_hours",
            ColumnType::Float,
            (0..rows).map(|i| 1_200.0 + 375.5 * i as f64),
        )
        .column(
            "max_payload_tons",
            ColumnType::Float,
            (0..rows).map(|i| 40.0 + ((i * 7) % 60) as f64),
        )
        .build()
}

/// Sensor readings referencing the first [`EQUIPMENT_ROWS`] machines.
pub fn sensor_readings() -> Result<Dataset> {
    sensor_readings_with_rows(SENSOR_READING_ROWS, EQUIPMENT_ROWS)
}

/// `rows` readings spread over `equipment_count` machines, one every 15 minutes.
pub fn sensor_readings_with_rows(rows: usize, equipment_count: usize) -> Result<Dataset> {
    let start = base_time()?;
    let equipment_count = equipment_count.max(1);
    Dataset::builder(SENSOR_READINGS)
        .column(
            "reading_id",
            ColumnType::Integer,
            (0..rows).map(|i| i as i64 + 1),
        )
        .column(
            "equipment_id",
            ColumnType::Text,
            (0..rows).map(|i| equipment_id(i % equipment_count)),
        )
        .column(
            "sensor_type",
            ColumnType::Text,
            (0..rows).map(|i| SENSOR_TYPES[i % 4].0),
        )
        .column(
            "reading_timestamp",
            ColumnType::Text,
            (0..rows).map(|i| {
                (start + Duration::minutes(15 * i as i64))
                    .format(TIMESTAMP_FORMAT)
                    .to_string()
            }),
        )
        .column(
            "reading_value",
            ColumnType::Float,
            (0..rows).map(|i| 20.5 + ((i * 13) % 80) as f64),
        )
        .column("unit", ColumnType::Text, (0..rows).map(|i| SENSOR_TYPES[i % 4].1))
        .column(
            "quality_flag",
            ColumnType::Text,
            (0..rows).map(|i| match i {
                i if i % 19 == 18 => "ALARM",
                i if i % 7 == 6 => "WARN",
                _ => "OK",
            }),
        )
        .build()
}

/// Two shifts a day of ore extraction, [`ORE_PRODUCTION_ROWS`] rows.
pub fn ore_production() -> Result<Dataset> {
    ore_production_with_rows(ORE_PRODUCTION_ROWS, EQUIPMENT_ROWS)
}

pub fn ore_production_with_rows(rows: usize, equipment_count: usize) -> Result<Dataset> {
    let start = base_date()?;
    let equipment_count = equipment_count.max(1);
    Dataset::builder(ORE_PRODUCTION)
        .column(
            "production_id",
            ColumnType::Integer,
            (0..rows).map(|i| i as i64 + 1),
        )
        .column(
            "production_date",
            ColumnType::Date,
            (0..rows).map(|i| start + Duration::days((i / 2) as i64)),
        )
        .column(
            "shift",
            ColumnType::Integer,
            (0..rows).map(|i| (i % 2) as i64 + 1),
        )
        .column("mine_id", ColumnType::Text, (0..rows).map(|i| mine_id(i / 2)))
        .column(
            "equipment_id",
            ColumnType::Text,
            (0..rows).map(|i| equipment_id(i % equipment_count)),
        )
        .column(
            "tonnage_extracted",
            ColumnType::Float,
            (0..rows).map(|i| 150.0 + ((i * 17) % 300) as f64),
        )
        .column(
            "fe_content_pct",
            ColumnType::Float,
            (0..rows).map(|i| 52.0 + ((i * 3) % 15) as f64 * 0.5),
        )
        .column(
            "moisture_pct",
            ColumnType::Float,
            (0..rows).map(|i| 4.0 + (i % 6) as f64 * 0.5),
        )
        .column(
            "status",
            ColumnType::Text,
            (0..rows).map(|i| if i % 5 == 4 { "Прервана" } else { "Завершена" }),
        )
        .build()
}

/// Planned and unplanned stoppages, [`DOWNTIME_EVENT_ROWS`] rows.
pub fn downtime_events() -> Result<Dataset> {
    downtime_events_with_rows(DOWNTIME_EVENT_ROWS, EQUIPMENT_ROWS)
}

pub fn downtime_events_with_rows(rows: usize, equipment_count: usize) -> Result<Dataset> {
    let start = base_time()?;
    let equipment_count = equipment_count.max(1);
    let planned = |i: usize| i % 3 == 2;
    Dataset::builder(DOWNTIME_EVENTS)
        .column("event_id", ColumnType::Integer, (0..rows).map(|i| i as i64 + 1))
        .column(
            "equipment_id",
            ColumnType::Text,
            (0..rows).map(|i| equipment_id((i * 5) % equipment_count)),
        )
        .column(
            "event_type",
            ColumnType::Text,
            (0..rows).map(|i| if planned(i) { "Плановое ТО" } else { "Незапланированный" }),
        )
        .column(
            "severity",
            ColumnType::Text,
            (0..rows).map(|i| {
                if planned(i) {
                    "Плановое"
                } else {
                    FAILURE_SEVERITIES[i % 4]
                }
            }),
        )
        .column(
            "start_time",
            ColumnType::Text,
            (0..rows).map(|i| {
                (start + Duration::hours(9 * i as i64))
                    .format(TIMESTAMP_FORMAT)
                    .to_string()
            }),
        )
        .column(
            "duration_minutes",
            ColumnType::Integer,
            (0..rows).map(|i| 30 + ((i * 45) % 600) as i64),
        )
        .build()
}

/// All four clean tables at their default sizes.
pub fn registry() -> Result<DatasetRegistry> {
    scaled_registry(1)
}

/// All four tables with every row count multiplied by `factor` (at least one).
pub fn scaled_registry(factor: usize) -> Result<DatasetRegistry> {
    let factor = factor.max(1);
    let equipment_rows = EQUIPMENT_ROWS * factor;
    Ok(DatasetRegistry::new()
        .with_dataset(equipment_with_rows(equipment_rows)?)
        .with_dataset(sensor_readings_with_rows(
            SENSOR_READING_ROWS * factor,
            equipment_rows,
        )?)
        .with_dataset(ore_production_with_rows(
            ORE_PRODUCTION_ROWS * factor,
            equipment_rows,
        )?)
        .with_dataset(downtime_events_with_rows(
            DOWNTIME_EVENT_ROWS * factor,
            equipment_rows,
        )?))
}
