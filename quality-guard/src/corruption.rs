//! Synthetic corruption harness.
//!
//! The harness takes a clean [`Dataset`] and a [`CorruptionSpec`] listing
//! named defect injectors, and produces a dirty copy together with the exact
//! list of defects it injected. Feeding the dirty copy back through the
//! suite that accepted the clean one shows which defects the suite catches.
//!
//! Rules of application:
//!
//! - the clean dataset is never modified; the dirty one keeps its name and schema
//! - injectors are applied in the order given, and an injector whose defect
//!   repeats an earlier one is applied once
//! - two different injectors may not touch the same cell; a duplicated key
//!   claims the cell it copies, which must not be null
//! - appended rows copy a row of the *clean* dataset, so earlier in-place
//!   defects never leak into them
//!
//! # Examples
//!
//! ```rust
//! use quality_guard::core::{ColumnType, Dataset, Value};
//! use quality_guard::corruption::{CorruptionHarness, CorruptionSpec, DefectKind};
//!
//! let clean = Dataset::builder("ore_production")
//!     .column("production_id", ColumnType::Integer, [1, 2, 3])
//!     .column("tonnage_extracted", ColumnType::Float, [210.0, 180.5, 240.0])
//!     .build()?;
//!
//! let spec = CorruptionSpec::new()
//!     .duplicate_key("duplicate production_id", "production_id", 1)
//!     .negative("negative tonnage", "tonnage_extracted", 2, -10.0);
//!
//! let outcome = CorruptionHarness::corrupt(&clean, &spec)?;
//! assert_eq!(outcome.dataset().row_count(), 4);
//! assert_eq!(outcome.dataset().value("tonnage_extracted", 2)?, Value::Float(-10.0));
//! assert_eq!(outcome.injected()[0].kind, DefectKind::DuplicateKey);
//! assert_eq!(outcome.injected()[0].row, 3);
//! assert_eq!(clean.row_count(), 3);
//! # Ok::<(), quality_guard::error::GuardError>(())
//! ```

use crate::core::{Dataset, Value};
use crate::log_data_op;
use crate::logging::LogConfig;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::instrument;

/// The catalog of defect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectKind {
    /// A required field set to null
    MissingRequired,
    /// A row whose key repeats an existing row's key
    DuplicateKey,
    /// A numeric field pushed outside its valid range
    OutOfRange,
    /// A numeric field forced negative
    Negative,
    /// A categorical field set outside its allowed values
    InvalidCategory,
}

impl DefectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefectKind::MissingRequired => "missing_required",
            DefectKind::DuplicateKey => "duplicate_key",
            DefectKind::OutOfRange => "out_of_range",
            DefectKind::Negative => "negative",
            DefectKind::InvalidCategory => "invalid_category",
        }
    }
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mutation of a clean dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Defect {
    /// Sets `column` at `row` to null.
    NullOut { column: String, row: usize },
    /// Appends a copy of `source_row`, duplicating its `column` key.
    DuplicateKey { column: String, source_row: usize },
    /// Sets numeric `column` at `row` to `value`, meant to lie outside the valid range.
    OutOfRange { column: String, row: usize, value: Value },
    /// Sets numeric `column` at `row` to the negative `value`.
    Negative { column: String, row: usize, value: Value },
    /// Sets `column` at `row` to `value`, meant to lie outside the allowed set.
    InvalidCategory { column: String, row: usize, value: Value },
}

impl Defect {
    pub fn kind(&self) -> DefectKind {
        match self {
            Defect::NullOut { .. } => DefectKind::MissingRequired,
            Defect::DuplicateKey { .. } => DefectKind::DuplicateKey,
            Defect::OutOfRange { .. } => DefectKind::OutOfRange,
            Defect::Negative { .. } => DefectKind::Negative,
            Defect::InvalidCategory { .. } => DefectKind::InvalidCategory,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Defect::NullOut { column, .. }
            | Defect::DuplicateKey { column, .. }
            | Defect::OutOfRange { column, .. }
            | Defect::Negative { column, .. }
            | Defect::InvalidCategory { column, .. } => column,
        }
    }

    /// The clean row this defect reads or writes.
    pub fn row(&self) -> usize {
        match self {
            Defect::NullOut { row, .. }
            | Defect::OutOfRange { row, .. }
            | Defect::Negative { row, .. }
            | Defect::InvalidCategory { row, .. } => *row,
            Defect::DuplicateKey { source_row, .. } => *source_row,
        }
    }

    /// Replacement value for in-place defects, `None` for appended rows.
    fn replacement(&self) -> Option<Value> {
        match self {
            Defect::NullOut { .. } => Some(Value::Null),
            Defect::DuplicateKey { .. } => None,
            Defect::OutOfRange { value, .. }
            | Defect::Negative { value, .. }
            | Defect::InvalidCategory { value, .. } => Some(value.clone()),
        }
    }

    fn check(&self, clean: &Dataset) -> std::result::Result<(), String> {
        let column_type = clean
            .schema()
            .resolve(self.column())
            .map_err(|e| e.to_string())?;
        if self.row() >= clean.row_count() {
            return Err(format!(
                "row {} is out of bounds for {} rows",
                self.row(),
                clean.row_count()
            ));
        }

        match self {
            Defect::OutOfRange { value, .. } | Defect::Negative { value, .. }
                if !column_type.is_numeric() || value.as_f64().is_none() =>
            {
                Err(format!(
                    "needs a numeric value on a numeric column, got {} on {column_type} column",
                    value.type_name()
                ))
            }
            Defect::Negative { value, .. } if value.as_f64().is_some_and(|v| v >= 0.0) => {
                Err(format!("value {value} is not negative"))
            }
            Defect::InvalidCategory { value, .. } if value.is_null() => {
                Err("an invalid category must not be null".to_string())
            }
            Defect::OutOfRange { value, .. }
            | Defect::Negative { value, .. }
            | Defect::InvalidCategory { value, .. }
                if !column_type.accepts(value) =>
            {
                Err(format!(
                    "{} value {value} does not fit {column_type} column '{}'",
                    value.type_name(),
                    self.column()
                ))
            }
            Defect::DuplicateKey {
                column, source_row, ..
            } => match clean.value(column, *source_row) {
                Ok(key) if key.is_null() => Err(format!(
                    "source row {source_row} has a null '{column}', which cannot collide"
                )),
                Ok(_) => Ok(()),
                Err(e) => Err(e.to_string()),
            },
            _ => Ok(()),
        }
    }
}

/// A defect with a human-readable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectInjector {
    pub name: String,
    pub defect: Defect,
}

/// Ordered list of named defect injectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorruptionSpec {
    injectors: Vec<DefectInjector>,
}

impl CorruptionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named injector.
    pub fn inject(mut self, name: impl Into<String>, defect: Defect) -> Self {
        self.injectors.push(DefectInjector {
            name: name.into(),
            defect,
        });
        self
    }

    pub fn null_out(self, name: impl Into<String>, column: impl Into<String>, row: usize) -> Self {
        self.inject(
            name,
            Defect::NullOut {
                column: column.into(),
                row,
            },
        )
    }

    pub fn duplicate_key(
        self,
        name: impl Into<String>,
        column: impl Into<String>,
        source_row: usize,
    ) -> Self {
        self.inject(
            name,
            Defect::DuplicateKey {
                column: column.into(),
                source_row,
            },
        )
    }

    pub fn out_of_range(
        self,
        name: impl Into<String>,
        column: impl Into<String>,
        row: usize,
        value: impl Into<Value>,
    ) -> Self {
        self.inject(
            name,
            Defect::OutOfRange {
                column: column.into(),
                row,
                value: value.into(),
            },
        )
    }

    pub fn negative(
        self,
        name: impl Into<String>,
        column: impl Into<String>,
        row: usize,
        value: impl Into<Value>,
    ) -> Self {
        self.inject(
            name,
            Defect::Negative {
                column: column.into(),
                row,
                value: value.into(),
            },
        )
    }

    pub fn invalid_category(
        self,
        name: impl Into<String>,
        column: impl Into<String>,
        row: usize,
        value: impl Into<Value>,
    ) -> Self {
        self.inject(
            name,
            Defect::InvalidCategory {
                column: column.into(),
                row,
                value: value.into(),
            },
        )
    }

    pub fn injectors(&self) -> &[DefectInjector] {
        &self.injectors
    }

    pub fn len(&self) -> usize {
        self.injectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.injectors.is_empty()
    }
}

/// Record of one defect actually present in a dirty dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectedDefect {
    pub name: String,
    pub kind: DefectKind,
    pub column: String,
    /// Row of the dirty dataset carrying the defect
    pub row: usize,
    /// Clean row that was copied, for duplicate keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_row: Option<usize>,
}

impl InjectedDefect {
    /// Every dirty row a correct rule should flag for this defect.
    ///
    /// For a duplicate key that is both the source row and the appended copy.
    pub fn affected_rows(&self) -> Vec<usize> {
        match self.source_row {
            Some(source) => vec![source, self.row],
            None => vec![self.row],
        }
    }
}

/// A dirty dataset and the defects injected into it.
#[derive(Debug, Clone)]
pub struct CorruptionOutcome {
    dataset: Dataset,
    injected: Vec<InjectedDefect>,
}

impl CorruptionOutcome {
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// Injected defects in the order they were applied.
    pub fn injected(&self) -> &[InjectedDefect] {
        &self.injected
    }

    pub fn injected_into<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a InjectedDefect> + 'a {
        self.injected.iter().filter(move |d| d.column == column)
    }
}

/// Applies corruption specs to clean datasets.
#[derive(Debug, Clone, Default)]
pub struct CorruptionHarness {
    log: LogConfig,
}

impl CorruptionHarness {
    pub fn new(log: LogConfig) -> Self {
        Self { log }
    }

    /// Corrupts `clean` with the default logging configuration.
    pub fn corrupt(clean: &Dataset, spec: &CorruptionSpec) -> Result<CorruptionOutcome> {
        Self::default().apply(clean, spec)
    }

    /// Produces a dirty copy of `clean` with every injector of `spec` applied.
    ///
    /// # Errors
    ///
    /// Fails without producing anything if an injector names an unknown
    /// column, a row outside the clean dataset, a value that does not fit the
    /// defect kind or column type, or a cell another injector already wrote.
    #[instrument(skip_all, fields(dataset = %clean.name(), injectors = spec.len()))]
    pub fn apply(&self, clean: &Dataset, spec: &CorruptionSpec) -> Result<CorruptionOutcome> {
        let injectors = plan(clean, spec)?;

        let mut columns = clean.to_columns();
        let mut injected = Vec::with_capacity(injectors.len());
        let mut next_row = clean.row_count();

        for injector in injectors {
            let defect = &injector.defect;
            let record = match defect.replacement() {
                Some(value) => {
                    let index = column_index(clean, defect.column())?;
                    columns[index][defect.row()] = value;
                    InjectedDefect {
                        name: injector.name.clone(),
                        kind: defect.kind(),
                        column: defect.column().to_string(),
                        row: defect.row(),
                        source_row: None,
                    }
                }
                None => {
                    let source_row = defect.row();
                    for (index, column) in columns.iter_mut().enumerate() {
                        let value = clean_value(clean, index, source_row)?;
                        column.push(value);
                    }
                    next_row += 1;
                    InjectedDefect {
                        name: injector.name.clone(),
                        kind: defect.kind(),
                        column: defect.column().to_string(),
                        row: next_row - 1,
                        source_row: Some(source_row),
                    }
                }
            };

            log_data_op!(
                self.log,
                defect.name = %record.name,
                defect.kind = %record.kind,
                defect.column = %record.column,
                defect.row = record.row,
                "Injected defect"
            );
            injected.push(record);
        }

        let dataset = clean.with_columns(columns).map_err(|e| match e {
            GuardError::TypeMismatch { expected, found } => GuardError::Configuration(format!(
                "corrupted value does not fit its column: expected {expected}, found {found}"
            )),
            other => other,
        })?;

        Ok(CorruptionOutcome { dataset, injected })
    }
}

/// Validates the spec and drops verbatim repeats.
fn plan<'a>(clean: &Dataset, spec: &'a CorruptionSpec) -> Result<Vec<&'a DefectInjector>> {
    let mut planned: Vec<&DefectInjector> = Vec::with_capacity(spec.len());
    let mut cells: HashMap<(usize, &str), &DefectInjector> = HashMap::new();

    for injector in spec.injectors() {
        injector
            .defect
            .check(clean)
            .map_err(|message| GuardError::invalid_defect(&injector.name, message))?;

        if planned.iter().any(|p| p.defect == injector.defect) {
            continue;
        }

        // A duplicate key claims its source cell.
        let cell = (injector.defect.row(), injector.defect.column());
        if let Some(previous) = cells.insert(cell, injector) {
            return Err(GuardError::invalid_defect(
                &injector.name,
                format!(
                    "row {} of column '{}' is already claimed by '{}'",
                    cell.0, cell.1, previous.name
                ),
            ));
        }
        planned.push(injector);
    }
    Ok(planned)
}

fn column_index(dataset: &Dataset, column: &str) -> Result<usize> {
    dataset
        .schema()
        .index_of(column)
        .ok_or_else(|| GuardError::ColumnNotFound {
            dataset: dataset.name().to_string(),
            column: column.to_string(),
        })
}

fn clean_value(clean: &Dataset, index: usize, row: usize) -> Result<Value> {
    let name = &clean.schema().columns()[index].name;
    clean.value(name, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ColumnType;

    fn clean() -> Dataset {
        Dataset::builder("ore_production")
            .column("production_id", ColumnType::Integer, [1, 2, 3, 4, 5])
            .column(
                "mine_id",
                ColumnType::Text,
                ["MINE-1", "MINE-2", "MINE-1", "MINE-2", "MINE-1"],
            )
            .column(
                "tonnage_extracted",
                ColumnType::Float,
                [210.0, 180.5, 240.0, 199.9, 305.2],
            )
            .column(
                "status",
                ColumnType::Text,
                ["Завершена", "Завершена", "Прервана", "Завершена", "Завершена"],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_each_defect_kind() {
        let clean = clean();
        let spec = CorruptionSpec::new()
            .null_out("null mine_id", "mine_id", 0)
            .duplicate_key("duplicate id", "production_id", 1)
            .out_of_range("huge tonnage", "tonnage_extracted", 2, 9_000.0)
            .negative("negative tonnage", "tonnage_extracted", 3, -10.0)
            .invalid_category("unknown status", "status", 4, "Неизвестно");

        let outcome = CorruptionHarness::corrupt(&clean, &spec).unwrap();
        let dirty = outcome.dataset();

        assert_eq!(dirty.name(), "ore_production");
        assert_eq!(dirty.row_count(), 6);
        assert_eq!(dirty.value("mine_id", 0).unwrap(), Value::Null);
        assert_eq!(dirty.value("production_id", 5).unwrap(), Value::Int(2));
        assert_eq!(dirty.value("mine_id", 5).unwrap(), Value::from("MINE-2"));
        assert_eq!(
            dirty.value("tonnage_extracted", 2).unwrap(),
            Value::Float(9_000.0)
        );
        assert_eq!(
            dirty.value("tonnage_extracted", 3).unwrap(),
            Value::Float(-10.0)
        );
        assert_eq!(dirty.value("status", 4).unwrap(), Value::from("Неизвестно"));

        let kinds: Vec<DefectKind> = outcome.injected().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DefectKind::MissingRequired,
                DefectKind::DuplicateKey,
                DefectKind::OutOfRange,
                DefectKind::Negative,
                DefectKind::InvalidCategory,
            ]
        );
        assert_eq!(outcome.injected()[1].affected_rows(), vec![1, 5]);
        assert_eq!(outcome.injected_into("tonnage_extracted").count(), 2);

        // The clean dataset is untouched.
        assert_eq!(clean.row_count(), 5);
        assert_eq!(clean.value("mine_id", 0).unwrap(), Value::from("MINE-1"));
    }

    #[test]
    fn test_repeated_injector_applies_once() {
        let spec = CorruptionSpec::new()
            .duplicate_key("dup", "production_id", 0)
            .duplicate_key("dup again", "production_id", 0)
            .null_out("null", "mine_id", 1)
            .null_out("null", "mine_id", 1);

        let outcome = CorruptionHarness::corrupt(&clean(), &spec).unwrap();
        assert_eq!(outcome.dataset().row_count(), 6);
        assert_eq!(outcome.injected().len(), 2);
    }

    #[test]
    fn test_conflicting_injectors_rejected() {
        let spec = CorruptionSpec::new()
            .negative("negative", "tonnage_extracted", 3, -10.0)
            .out_of_range("huge", "tonnage_extracted", 3, 900.0);

        let err = CorruptionHarness::corrupt(&clean(), &spec).unwrap_err();
        assert!(matches!(err, GuardError::InvalidDefect { ref name, .. } if name == "huge"));
    }

    #[test]
    fn test_appended_row_copies_clean_source() {
        let spec = CorruptionSpec::new()
            .null_out("null", "mine_id", 1)
            .duplicate_key("dup", "production_id", 1);

        let outcome = CorruptionHarness::corrupt(&clean(), &spec).unwrap();
        assert_eq!(outcome.dataset().value("mine_id", 1).unwrap(), Value::Null);
        assert_eq!(
            outcome.dataset().value("mine_id", 5).unwrap(),
            Value::from("MINE-2")
        );
    }

    #[test]
    fn test_deterministic() {
        let spec = CorruptionSpec::new()
            .duplicate_key("dup", "production_id", 2)
            .negative("neg", "tonnage_extracted", 0, -1.0);
        let clean = clean();

        let first = CorruptionHarness::corrupt(&clean, &spec).unwrap();
        let second = CorruptionHarness::corrupt(&clean, &spec).unwrap();
        assert_eq!(first.injected(), second.injected());
        assert_eq!(
            first.dataset().record_batch(),
            second.dataset().record_batch()
        );
    }

    #[test]
    fn test_invalid_injectors() {
        let clean = clean();
        let cases = vec![
            CorruptionSpec::new().null_out("missing column", "equipment_id", 0),
            CorruptionSpec::new().null_out("row out of bounds", "mine_id", 5),
            CorruptionSpec::new().negative("not negative", "tonnage_extracted", 0, 5.0),
            CorruptionSpec::new().negative("text column", "status", 0, -1.0),
            CorruptionSpec::new().out_of_range("text value", "tonnage_extracted", 0, "big"),
            CorruptionSpec::new().invalid_category("null category", "status", 0, Value::Null),
            CorruptionSpec::new().invalid_category("numeric category", "status", 0, 3),
            CorruptionSpec::new().negative("fractional id", "production_id", 0, -10.5),
            CorruptionSpec::new().out_of_range("huge id", "production_id", 0, 1e30),
            CorruptionSpec::new().invalid_category("text id", "production_id", 0, "x"),
        ];

        for spec in cases {
            let expected = spec.injectors()[0].name.clone();
            let err = CorruptionHarness::corrupt(&clean, &spec).unwrap_err();
            assert!(
                matches!(err, GuardError::InvalidDefect { ref name, .. } if *name == expected),
                "expected invalid defect for {expected:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_duplicate_key_claims_source_cell() {
        let clean = clean();
        let specs = [
            CorruptionSpec::new()
                .null_out("null key", "production_id", 1)
                .duplicate_key("dup key", "production_id", 1),
            CorruptionSpec::new()
                .duplicate_key("dup key", "production_id", 1)
                .negative("negative key", "production_id", 1, -7),
        ];
        let later = ["dup key", "negative key"];

        for (spec, later) in specs.iter().zip(later) {
            let err = CorruptionHarness::corrupt(&clean, spec).unwrap_err();
            assert!(
                matches!(err, GuardError::InvalidDefect { ref name, .. } if name == later),
                "{err}"
            );
        }
    }

    #[test]
    fn test_duplicate_of_null_key_rejected() {
        let clean = Dataset::builder("d")
            .column("id", ColumnType::Integer, [Some(1), None, Some(3)])
            .build()
            .unwrap();
        let spec = CorruptionSpec::new().duplicate_key("dup null", "id", 1);

        let err = CorruptionHarness::corrupt(&clean, &spec).unwrap_err();
        assert!(matches!(err, GuardError::InvalidDefect { ref name, .. } if name == "dup null"));
    }

    #[test]
    fn test_empty_spec_copies_dataset() {
        let clean = clean();
        let outcome = CorruptionHarness::corrupt(&clean, &CorruptionSpec::new()).unwrap();
        assert!(outcome.injected().is_empty());
        assert_eq!(outcome.dataset().record_batch(), clean.record_batch());
    }
}
