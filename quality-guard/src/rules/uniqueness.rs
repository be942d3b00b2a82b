//! Duplicate detection for `unique` rules.
//!
//! Every member of a duplicate group is a violation, not only the second and
//! later occurrences. Nulls never collide with each other.

use crate::core::{Column, ValueKey};
use std::collections::HashMap;

/// Rows taking part in any group of equal non-null values, ascending.
pub(super) fn duplicate_rows(column: &Column<'_>) -> Vec<usize> {
    let mut groups: HashMap<ValueKey, Vec<usize>> = HashMap::new();
    for (row, value) in column.iter().enumerate() {
        if let Some(key) = value.key() {
            groups.entry(key).or_default().push(row);
        }
    }

    let mut rows: Vec<usize> = groups
        .into_values()
        .filter(|group| group.len() > 1)
        .flatten()
        .collect();
    rows.sort_unstable();
    rows
}
