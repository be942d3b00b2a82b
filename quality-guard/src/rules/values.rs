//! Set membership for `value_in_set` rules.

use crate::core::{Column, Value, ValueKey};
use std::collections::HashSet;

/// Rows whose non-null value is not in `allowed`. Nulls are not violations.
pub(super) fn rows_outside_set(column: &Column<'_>, allowed: &[Value]) -> Vec<usize> {
    let allowed: HashSet<ValueKey> = allowed.iter().filter_map(Value::key).collect();
    column
        .iter()
        .enumerate()
        .filter_map(|(row, value)| {
            let key = value.key()?;
            (!allowed.contains(&key)).then_some(row)
        })
        .collect()
}
