//! Null detection for `not_null` rules.

use crate::core::Column;

/// Rows whose value is null (or a float `NaN`).
pub(super) fn null_rows(column: &Column<'_>) -> Vec<usize> {
    column
        .iter()
        .enumerate()
        .filter_map(|(row, value)| value.is_null().then_some(row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnType, Dataset, Value};

    #[test]
    fn test_null_rows() {
        let dataset = Dataset::builder("d")
            .column("mine_id", ColumnType::Text, [Some("MINE-1"), None, Some("MINE-2"), None])
            .column(
                "moisture_pct",
                ColumnType::Float,
                [Value::Float(4.2), Value::Float(f64::NAN), Value::Null, Value::Float(0.0)],
            )
            .build()
            .unwrap();

        assert_eq!(null_rows(&dataset.column("mine_id").unwrap()), vec![1, 3]);
        assert_eq!(null_rows(&dataset.column("moisture_pct").unwrap()), vec![1, 2]);
    }

    #[test]
    fn test_no_rows() {
        let dataset = Dataset::builder("d")
            .column("a", ColumnType::Integer, Vec::<Value>::new())
            .build()
            .unwrap();
        assert!(null_rows(&dataset.column("a").unwrap()).is_empty());
    }
}
