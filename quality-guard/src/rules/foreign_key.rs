//! Referential integrity for `foreign_key` rules.
//!
//! The reference column is loaded into a hash set once, so each child row is
//! a constant-time lookup. Null child values are not violations; pair the rule
//! with `not_null` when the key is mandatory.

use crate::core::{Column, ValueKey};
use std::collections::HashSet;

/// Child rows whose non-null value does not occur in `reference`.
pub(super) fn orphan_rows(column: &Column<'_>, reference: &Column<'_>) -> Vec<usize> {
    let known: HashSet<ValueKey> = reference.iter().filter_map(|value| value.key()).collect();
    column
        .iter()
        .enumerate()
        .filter_map(|(row, value)| {
            let key = value.key()?;
            (!known.contains(&key)).then_some(row)
        })
        .collect()
}
