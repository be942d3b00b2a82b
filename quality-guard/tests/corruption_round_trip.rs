//! Corrupt clean fixtures with known defects and check the suites flag
//! exactly those defects and nothing else.

use quality_guard::catalog::{self, EQUIPMENT, ORE_PRODUCTION};
use quality_guard::core::{DatasetRegistry, ExpectationKind, Value};
use quality_guard::corruption::{CorruptionHarness, CorruptionSpec, DefectKind};
use quality_guard::engine::ValidationEngine;
use quality_guard::error::GuardError;
use quality_guard::fixtures;

#[test]
fn test_ore_production_round_trip() {
    let clean = fixtures::ore_production().unwrap();
    let suite = catalog::ore_production_suite(clean.schema()).unwrap();
    let engine = ValidationEngine::new();
    let references = DatasetRegistry::new();

    let clean_report = engine.evaluate(&suite, &clean, &references).unwrap();
    assert!(clean_report.overall_success());

    let outcome =
        CorruptionHarness::corrupt(&clean, &catalog::ore_production_corruption()).unwrap();
    let dirty = outcome.dataset();
    assert_eq!(dirty.name(), ORE_PRODUCTION);
    assert_eq!(dirty.row_count(), clean.row_count() + 1);
    assert_eq!(outcome.injected().len(), 5);

    let report = engine.evaluate(&suite, dirty, &references).unwrap();
    assert!(!report.overall_success());
    assert_eq!(report.failed_count(), 5);
    assert_eq!(report.passed_count(), suite.len() - 5);

    let failed: Vec<(ExpectationKind, Option<&str>, &[usize])> = report
        .failed_results()
        .map(|r| (r.kind(), r.column(), r.violating_rows()))
        .collect();
    assert_eq!(
        failed,
        vec![
            (ExpectationKind::Unique, Some("production_id"), &[1, 14][..]),
            (ExpectationKind::NotNull, Some("mine_id"), &[0][..]),
            (ExpectationKind::ValueInSet, Some("status"), &[4][..]),
            (ExpectationKind::Range, Some("tonnage_extracted"), &[3][..]),
            (ExpectationKind::Range, Some("fe_content_pct"), &[2][..]),
        ]
    );

    let status = report
        .results_for_column("status")
        .find(|r| !r.success())
        .unwrap();
    assert_eq!(status.sample_violating_values(), &[Value::from("Неизвестно")]);

    let fe = report
        .results_for_column("fe_content_pct")
        .next()
        .unwrap();
    assert_eq!(fe.sample_violating_values(), &[Value::Float(150.0)]);

    // The row count rule still passes on the grown dataset.
    let size = report.results().last().unwrap();
    assert_eq!(size.kind(), ExpectationKind::RowCountAtLeast);
    assert!(size.success());
    assert_eq!(size.observed_row_count(), Some(15));
}

#[test]
fn test_injected_defects_line_up_with_violations() {
    let clean = fixtures::ore_production().unwrap();
    let suite = catalog::ore_production_suite(clean.schema()).unwrap();
    let outcome =
        CorruptionHarness::corrupt(&clean, &catalog::ore_production_corruption()).unwrap();
    let report = ValidationEngine::new()
        .evaluate(&suite, outcome.dataset(), &DatasetRegistry::new())
        .unwrap();

    for defect in outcome.injected() {
        let caught = report
            .results_for_column(&defect.column)
            .filter(|r| !r.success())
            .any(|r| {
                defect
                    .affected_rows()
                    .iter()
                    .all(|row| r.violating_rows().contains(row))
            });
        assert!(caught, "defect '{}' was not caught", defect.name);
    }

    let duplicate = outcome
        .injected()
        .iter()
        .find(|d| d.kind == DefectKind::DuplicateKey)
        .unwrap();
    assert_eq!(duplicate.row, 14);
    assert_eq!(duplicate.source_row, Some(1));
}

#[test]
fn test_clean_dataset_untouched() {
    let clean = fixtures::ore_production().unwrap();
    let before = clean.record_batch().clone();
    let _ = CorruptionHarness::corrupt(&clean, &catalog::ore_production_corruption()).unwrap();
    assert_eq!(clean.record_batch(), &before);
}

#[test]
fn test_equipment_defects_each_caught() {
    let clean = fixtures::equipment().unwrap();
    let suite = catalog::equipment_suite(clean.schema()).unwrap();
    let spec = CorruptionSpec::new()
        .null_out("missing name", "equipment_name", 3)
        .invalid_category("unknown mine", "mine_id", 5, "MINE-9")
        .negative("negative hours", "engine_hours", 7, -1.0)
        .out_of_range("too old", "year_manufactured", 9, 1995);

    let outcome = CorruptionHarness::corrupt(&clean, &spec).unwrap();
    let report = ValidationEngine::new()
        .evaluate(&suite, outcome.dataset(), &DatasetRegistry::new())
        .unwrap();

    let failed: Vec<(Option<&str>, &[usize])> = report
        .failed_results()
        .map(|r| (r.column(), r.violating_rows()))
        .collect();
    assert_eq!(
        failed,
        vec![
            (Some("equipment_name"), &[3][..]),
            (Some("mine_id"), &[5][..]),
            (Some("year_manufactured"), &[9][..]),
            (Some("engine_hours"), &[7][..]),
        ]
    );
    assert_eq!(outcome.dataset().name(), EQUIPMENT);
}

#[test]
fn test_conflicting_injectors_rejected() {
    let clean = fixtures::ore_production().unwrap();
    let spec = CorruptionSpec::new()
        .null_out("null status", "status", 4)
        .invalid_category("unknown status", "status", 4, "Неизвестно");

    let err = CorruptionHarness::corrupt(&clean, &spec).unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, GuardError::InvalidDefect { ref name, .. } if name == "unknown status"));
}

#[test]
fn test_repeated_injector_applied_once() {
    let clean = fixtures::ore_production().unwrap();
    let spec = CorruptionSpec::new()
        .duplicate_key("dup", "production_id", 1)
        .duplicate_key("dup again", "production_id", 1);

    let outcome = CorruptionHarness::corrupt(&clean, &spec).unwrap();
    assert_eq!(outcome.dataset().row_count(), clean.row_count() + 1);
    assert_eq!(outcome.injected().len(), 1);
}

#[test]
fn test_duplicate_key_source_cell_cannot_be_rewritten() {
    let clean = fixtures::ore_production().unwrap();
    let specs = [
        CorruptionSpec::new()
            .null_out("null key", "production_id", 1)
            .duplicate_key("dup key", "production_id", 1),
        CorruptionSpec::new()
            .duplicate_key("dup key", "production_id", 1)
            .out_of_range("shifted key", "production_id", 1, 9_999),
    ];

    for spec in &specs {
        let err = CorruptionHarness::corrupt(&clean, spec).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, GuardError::InvalidDefect { .. }), "{err}");
    }

    // Rewriting a different column of the source row keeps the duplicate intact.
    let spec = CorruptionSpec::new()
        .null_out("null mine_id", "mine_id", 1)
        .duplicate_key("dup key", "production_id", 1);
    let outcome = CorruptionHarness::corrupt(&clean, &spec).unwrap();
    let suite = catalog::ore_production_suite(clean.schema()).unwrap();
    let report = ValidationEngine::new()
        .evaluate(&suite, outcome.dataset(), &DatasetRegistry::new())
        .unwrap();
    let unique = report
        .results_for_column("production_id")
        .find(|r| r.kind() == ExpectationKind::Unique)
        .unwrap();
    assert_eq!(unique.violating_rows(), &[1, 14]);
}

#[test]
fn test_injected_value_must_fit_column_type() {
    let clean = fixtures::ore_production().unwrap();
    let cases = [
        CorruptionSpec::new().negative("fractional shift", "shift", 0, -1.5),
        CorruptionSpec::new().invalid_category("text shift", "shift", 0, "night"),
        CorruptionSpec::new().invalid_category("numeric status", "status", 0, 3),
    ];

    for spec in &cases {
        let expected = &spec.injectors()[0].name;
        let err = CorruptionHarness::corrupt(&clean, spec).unwrap_err();
        assert!(
            matches!(err, GuardError::InvalidDefect { ref name, .. } if name == expected),
            "{err}"
        );
    }

    let outcome = CorruptionHarness::corrupt(
        &clean,
        &CorruptionSpec::new().invalid_category("third shift", "shift", 0, 3),
    )
    .unwrap();
    assert_eq!(outcome.dataset().value("shift", 0).unwrap(), Value::Int(3));
}
