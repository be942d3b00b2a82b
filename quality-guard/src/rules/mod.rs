//! Evaluation of individual expectations.
//!
//! Each submodule computes the violating rows of one rule kind as a sorted
//! list of row indices. This module dispatches on the [`Expectation`] variant
//! and turns those rows into an [`ExpectationResult`], sampling the first few
//! offending values. Everything here is a pure function of its inputs, so
//! rules can be evaluated in any order or in parallel.

mod completeness;
mod foreign_key;
mod range;
mod size;
mod uniqueness;
mod values;

use crate::core::{Column, Dataset, DatasetRegistry, Expectation, ExpectationResult};
use crate::prelude::*;

/// Evaluates one expectation against `dataset`.
///
/// Errors only on configuration problems (missing column or reference
/// dataset); a rule that does not hold is an unsuccessful result.
pub(crate) fn evaluate(
    expectation: &Expectation,
    dataset: &Dataset,
    references: &DatasetRegistry,
    sample_limit: usize,
) -> Result<ExpectationResult> {
    let result = match expectation {
        Expectation::NotNull { column } => {
            let column = dataset.column(column)?;
            let rows = completeness::null_rows(&column);
            row_result(expectation, &column, rows, sample_limit)
        }
        Expectation::Unique { column } => {
            let column = dataset.column(column)?;
            let rows = uniqueness::duplicate_rows(&column);
            row_result(expectation, &column, rows, sample_limit)
        }
        Expectation::ValueInSet { column, allowed } => {
            let column = dataset.column(column)?;
            let rows = values::rows_outside_set(&column, allowed);
            row_result(expectation, &column, rows, sample_limit)
        }
        Expectation::Range { column, min, max } => {
            let column = dataset.column(column)?;
            let rows = range::rows_out_of_range(&column, *min, *max);
            row_result(expectation, &column, rows, sample_limit)
        }
        Expectation::RowCountAtLeast { min } => {
            size::row_count_at_least(expectation, dataset, *min)
        }
        Expectation::ForeignKey {
            column,
            reference_dataset,
            reference_column,
        } => {
            let column = dataset.column(column)?;
            let reference = references
                .get(reference_dataset)
                .ok_or_else(|| GuardError::MissingReference {
                    dataset: reference_dataset.clone(),
                })?
                .column(reference_column)?;
            let rows = foreign_key::orphan_rows(&column, &reference);
            row_result(expectation, &column, rows, sample_limit)
        }
    };
    Ok(result)
}

fn row_result(
    expectation: &Expectation,
    column: &Column<'_>,
    rows: Vec<usize>,
    sample_limit: usize,
) -> ExpectationResult {
    let samples = rows
        .iter()
        .take(sample_limit)
        .map(|&row| column.value(row))
        .collect();
    ExpectationResult::from_violations(expectation.clone(), rows, samples)
}
