//! Row filtering for [`crate::types::DataSet`].

use std::fmt;

use crate::error::{CleaningError, CleaningResult};
use crate::types::{DataSet, Value};

use super::missing_column;

/// Comparison applied between a cell and the filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Rendered cell equals the value.
    Equals,
    /// Rendered cell differs from the value; nulls always qualify.
    NotEquals,
    /// Numeric cell greater than the value.
    Greater,
    /// Numeric cell less than the value.
    Less,
    /// Rendered cell contains the value as a substring.
    Contains,
    /// Rendered cell does not contain the value; nulls always qualify.
    NotContains,
}

impl FilterOperator {
    pub fn parse(name: &str) -> CleaningResult<Self> {
        match name {
            "equals" => Ok(Self::Equals),
            "not_equals" => Ok(Self::NotEquals),
            "greater" => Ok(Self::Greater),
            "less" => Ok(Self::Less),
            "contains" => Ok(Self::Contains),
            "not_contains" => Ok(Self::NotContains),
            other => Err(CleaningError::UnknownOperator(other.to_owned())),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Greater => "greater",
            Self::Less => "less",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
        })
    }
}

/// Keep the rows whose `column` cell satisfies `op` against `value`.
///
/// `Greater` and `Less` need `value` to parse as a number; cells that are null or not numeric
/// never satisfy them.
pub fn filter_rows(
    dataset: &DataSet,
    column: &str,
    op: FilterOperator,
    value: &str,
) -> CleaningResult<DataSet> {
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| missing_column(dataset, column))?;

    let threshold = match op {
        FilterOperator::Greater | FilterOperator::Less => Some(
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| CleaningError::InvalidValue {
                    value: value.to_owned(),
                    message: format!("'{op}' needs a numeric comparison value"),
                })?,
        ),
        _ => None,
    };

    Ok(dataset.filter_rows(|row| {
        let cell = row.get(idx).unwrap_or(&Value::Null);
        match (op, threshold) {
            (FilterOperator::Greater, Some(t)) => cell.as_f64().is_some_and(|v| v > t),
            (FilterOperator::Less, Some(t)) => cell.as_f64().is_some_and(|v| v < t),
            (FilterOperator::Equals, _) => cell.to_text().is_some_and(|s| s == value),
            (FilterOperator::NotEquals, _) => cell.to_text().is_none_or(|s| s != value),
            (FilterOperator::Contains, _) => cell.to_text().is_some_and(|s| s.contains(value)),
            (FilterOperator::NotContains, _) => cell.to_text().is_none_or(|s| !s.contains(value)),
            _ => false,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("active", DataType::Bool),
            Field::new("name", DataType::Utf8),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Bool(true), Value::Utf8("alpha".to_string())],
            vec![Value::Int64(2), Value::Bool(false), Value::Null],
            vec![Value::Int64(3), Value::Bool(true), Value::Utf8("beta".to_string())],
        ];

        DataSet::new(schema, rows)
    }

    fn ids(ds: &DataSet) -> Vec<Value> {
        ds.column(0).cloned().collect()
    }

    #[test]
    fn equals_matches_rendered_booleans() {
        let ds = sample_dataset();

        let out = filter_rows(&ds, "active", FilterOperator::Equals, "True").unwrap();

        assert_eq!(out.schema, ds.schema);
        assert_eq!(ids(&out), vec![Value::Int64(1), Value::Int64(3)]);
        // Original unchanged
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn numeric_comparisons() {
        let ds = sample_dataset();
        let out = filter_rows(&ds, "id", FilterOperator::Greater, "1").unwrap();
        assert_eq!(ids(&out), vec![Value::Int64(2), Value::Int64(3)]);
        let out = filter_rows(&ds, "id", FilterOperator::Less, " 2.5 ").unwrap();
        assert_eq!(ids(&out), vec![Value::Int64(1), Value::Int64(2)]);
        // Text cells are parsed when possible and skipped otherwise.
        let out = filter_rows(&ds, "name", FilterOperator::Greater, "0").unwrap();
        assert_eq!(out.row_count(), 0);
    }

    #[test]
    fn text_comparisons_and_nulls() {
        let ds = sample_dataset();
        let out = filter_rows(&ds, "name", FilterOperator::Equals, "beta").unwrap();
        assert_eq!(ids(&out), vec![Value::Int64(3)]);
        let out = filter_rows(&ds, "name", FilterOperator::NotEquals, "beta").unwrap();
        assert_eq!(ids(&out), vec![Value::Int64(1), Value::Int64(2)]);
        let out = filter_rows(&ds, "name", FilterOperator::Contains, "a").unwrap();
        assert_eq!(ids(&out), vec![Value::Int64(1), Value::Int64(3)]);
        let out = filter_rows(&ds, "name", FilterOperator::NotContains, "lph").unwrap();
        assert_eq!(ids(&out), vec![Value::Int64(2), Value::Int64(3)]);
        let out = filter_rows(&ds, "active", FilterOperator::Equals, "True").unwrap();
        assert_eq!(ids(&out), vec![Value::Int64(1), Value::Int64(3)]);
    }

    #[test]
    fn contains_is_literal_not_a_pattern() {
        let ds = sample_dataset();
        let out = filter_rows(&ds, "name", FilterOperator::Contains, "a.*").unwrap();
        assert!(out.rows.is_empty());
    }

    #[test]
    fn errors_for_missing_column_and_bad_threshold() {
        let ds = sample_dataset();
        let err = filter_rows(&ds, "age", FilterOperator::Equals, "1").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Column 'age' not found in CSV. Available columns: ["id", "active", "name"]"#
        );
        assert!(matches!(
            filter_rows(&ds, "id", FilterOperator::Greater, "ten"),
            Err(CleaningError::InvalidValue { .. })
        ));
        assert!(matches!(
            FilterOperator::parse("like"),
            Err(CleaningError::UnknownOperator(_))
        ));
    }
}
