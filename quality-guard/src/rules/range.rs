//! Closed-interval checks for `range` rules.

use crate::core::Column;

/// Rows whose non-null numeric value is below `min` or above `max`.
///
/// Bounds are inclusive and either may be absent.
pub(super) fn rows_out_of_range(
    column: &Column<'_>,
    min: Option<f64>,
    max: Option<f64>,
) -> Vec<usize> {
    column
        .iter()
        .enumerate()
        .filter_map(|(row, value)| {
            let v = value.as_f64()?;
            let below = min.is_some_and(|min| v < min);
            let above = max.is_some_and(|max| v > max);
            (below || above).then_some(row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnType, Dataset, Value};

    fn fe_content() -> Dataset {
        Dataset::builder("d")
            .column(
                "fe_content_pct",
                ColumnType::Float,
                [
                    Value::Float(0.0),
                    Value::Float(100.0),
                    Value::Float(150.0),
                    Value::Null,
                    Value::Float(-0.5),
                    Value::Float(57.3),
                ],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_closed_bounds() {
        let dataset = fe_content();
        let column = dataset.column("fe_content_pct").unwrap();
        assert_eq!(rows_out_of_range(&column, Some(0.0), Some(100.0)), vec![2, 4]);
    }

    #[test]
    fn test_open_ended_bounds() {
        let dataset = fe_content();
        let column = dataset.column("fe_content_pct").unwrap();
        assert_eq!(rows_out_of_range(&column, Some(0.0), None), vec![4]);
        assert_eq!(rows_out_of_range(&column, None, Some(100.0)), vec![2]);
        assert!(rows_out_of_range(&column, None, None).is_empty());
    }

    #[test]
    fn test_integer_column() {
        let dataset = Dataset::builder("d")
            .column("duration_minutes", ColumnType::Integer, [0, 1, 1440, 1441])
            .build()
            .unwrap();
        let column = dataset.column("duration_minutes").unwrap();
        assert_eq!(rows_out_of_range(&column, Some(1.0), Some(1440.0)), vec![0, 3]);
    }
}
