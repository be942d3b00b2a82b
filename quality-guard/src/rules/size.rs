//! Table-level row count rules.

use crate::core::{Dataset, Expectation, ExpectationResult};

pub(super) fn row_count_at_least(
    expectation: &Expectation,
    dataset: &Dataset,
    min: usize,
) -> ExpectationResult {
    let observed = dataset.row_count();
    ExpectationResult::table_level(expectation.clone(), observed >= min, observed)
}
