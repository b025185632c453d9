//! Column reductions for [`crate::types::DataSet`].

use std::collections::HashMap;

use crate::types::{DataSet, DataType, Value, ValueKey};

/// Column statistics used to impute missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Arithmetic mean of numeric values, ignoring nulls.
    Mean,
    /// Median of numeric values, ignoring nulls.
    Median,
    /// Most frequent non-null value; ties resolve to the smallest value.
    Mode,
}

/// Reduce the column at `idx`. Out-of-range indexes reduce an empty column.
///
/// - `Mean`/`Median` are `Float64`, or `Value::Null` for non-numeric columns and columns with no
///   non-null values.
/// - `Mode` works on any column and returns `Value::Null` when every value is null.
pub fn reduce_at(dataset: &DataSet, idx: usize, op: ReduceOp) -> Value {
    let data_type = dataset
        .schema
        .fields
        .get(idx)
        .map(|f| f.data_type)
        .unwrap_or(DataType::Utf8);

    match op {
        ReduceOp::Mean | ReduceOp::Median if !data_type.is_numeric() => Value::Null,
        ReduceOp::Mean => {
            let values = numeric_values(dataset, idx);
            if values.is_empty() {
                Value::Null
            } else {
                Value::Float64(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        ReduceOp::Median => {
            let mut values = numeric_values(dataset, idx);
            if values.is_empty() {
                return Value::Null;
            }
            values.sort_by(f64::total_cmp);
            let mid = values.len() / 2;
            let median = if values.len() % 2 == 0 {
                (values[mid - 1] + values[mid]) / 2.0
            } else {
                values[mid]
            };
            Value::Float64(median)
        }
        ReduceOp::Mode => reduce_mode(dataset, idx),
    }
}

fn numeric_values(dataset: &DataSet, idx: usize) -> Vec<f64> {
    dataset.column(idx).filter_map(Value::as_f64).collect()
}

fn reduce_mode(dataset: &DataSet, idx: usize) -> Value {
    let mut counts: HashMap<ValueKey, (usize, &Value)> = HashMap::new();
    for v in dataset.column(idx).filter(|v| !v.is_null()) {
        counts.entry(v.key()).or_insert((0, v)).0 += 1;
    }

    let Some(best) = counts.values().map(|(n, _)| *n).max() else {
        return Value::Null;
    };
    counts
        .into_values()
        .filter(|(n, _)| *n == best)
        .map(|(_, v)| v)
        .min_by(|a, b| a.compare(b))
        .cloned()
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::{reduce_at, ReduceOp};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    const ID: usize = 0;
    const SCORE: usize = 1;

    fn numeric_dataset_with_nulls() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("score", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Float64(10.0)],
            vec![Value::Int64(2), Value::Null],
            vec![Value::Int64(3), Value::Float64(5.5)],
            vec![Value::Int64(4), Value::Float64(5.5)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn reduce_mean_and_median() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce_at(&ds, SCORE, ReduceOp::Mean), Value::Float64(7.0));
        assert_eq!(reduce_at(&ds, SCORE, ReduceOp::Median), Value::Float64(5.5));
        assert_eq!(reduce_at(&ds, ID, ReduceOp::Median), Value::Float64(2.5));
    }

    #[test]
    fn reduce_mode_prefers_most_frequent_then_smallest() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce_at(&ds, SCORE, ReduceOp::Mode), Value::Float64(5.5));
        // All ids are unique: the smallest wins.
        assert_eq!(reduce_at(&ds, ID, ReduceOp::Mode), Value::Int64(1));
    }

    #[test]
    fn reduce_out_of_range_column_is_null() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce_at(&ds, 9, ReduceOp::Mean), Value::Null);
        assert_eq!(reduce_at(&ds, 9, ReduceOp::Mode), Value::Null);
    }

    #[test]
    fn reduce_numeric_ops_on_text_or_all_null_columns_are_null() {
        let schema = Schema::new(vec![
            Field::new("score", DataType::Float64),
            Field::new("name", DataType::Utf8),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Null, Value::Utf8("a".to_string())],
                vec![Value::Null, Value::Utf8("1".to_string())],
            ],
        );
        assert_eq!(reduce_at(&ds, 0, ReduceOp::Mean), Value::Null);
        assert_eq!(reduce_at(&ds, 0, ReduceOp::Mode), Value::Null);
        assert_eq!(reduce_at(&ds, 1, ReduceOp::Mean), Value::Null);
    }
}
