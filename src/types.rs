//! Core data model types.
//!
//! Every loader produces an in-memory [`DataSet`]: a [`Schema`] of named, typed [`Field`]s plus
//! row-major [`Value`] storage. Column types are inferred at load time rather than declared.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Calendar date without a time component.
    Date,
    /// Date with a time-of-day component.
    DateTime,
}

impl DataType {
    /// Returns true for `Int64` and `Float64`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }

    /// Short lowercase name used in inspection reports.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::Bool => "bool",
            DataType::Utf8 => "utf8",
            DataType::Date => "date",
            DataType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time of day.
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value.
    ///
    /// Integers, floats and booleans (as 1/0) convert directly; text is parsed after trimming.
    /// Everything else, including nulls and unparseable text, yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) if !v.is_nan() => Some(*v),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Utf8(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
            _ => None,
        }
    }

    /// Text rendering of a non-null value; `None` for nulls.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Approximate heap + inline footprint of this value in bytes.
    pub fn approx_size(&self) -> usize {
        let heap = match self {
            Value::Utf8(s) => s.capacity(),
            _ => 0,
        };
        std::mem::size_of::<Value>() + heap
    }

    /// Total order between two non-null values of comparable kinds.
    ///
    /// Numbers compare numerically across `Int64`/`Float64`; mismatched kinds compare by their
    /// text rendering so the order is still total.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Int64(_) | Value::Float64(_), Value::Int64(_) | Value::Float64(_)) => {
                let a = self.as_f64().unwrap_or(f64::NAN);
                let b = other.as_f64().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Utf8(a), Value::Utf8(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }

    /// Hashable identity used for duplicate detection and mode counting.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Int64(v) => ValueKey::Int(*v),
            // Normalize -0.0 to 0.0 so equal floats share a key.
            Value::Float64(v) => ValueKey::Float(if *v == 0.0 { 0 } else { v.to_bits() }),
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Utf8(s) => ValueKey::Text(s.clone()),
            Value::Date(d) => ValueKey::Date(*d),
            Value::DateTime(dt) => ValueKey::DateTime(*dt),
        }
    }

    /// Convert to a JSON value for reports and JSON output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int64(v) => serde_json::Value::from(*v),
            Value::Float64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

/// Renders the cell the way it is written to CSV: nulls are empty, integral floats keep a `.0`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Value::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            Value::Utf8(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Hashable projection of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Where a [`DataSet`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Parsed from content passed in the source string itself.
    Inline,
    /// Read from a resolved file path.
    Path(std::path::PathBuf),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Inline => f.write_str("inline"),
            Origin::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
    /// Where the rows came from.
    pub origin: Origin,
}

impl DataSet {
    /// Create an inline-origin dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self {
            schema,
            rows,
            origin: Origin::Inline,
        }
    }

    /// Replace the origin.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_owned).collect()
    }

    /// Iterate the values of one column.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Number of null cells in a column.
    pub fn null_count(&self, idx: usize) -> usize {
        self.column(idx).filter(|v| v.is_null()).count()
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema and origin.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
            origin: self.origin.clone(),
        }
    }

    /// Returns a copy limited to the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
            origin: self.origin.clone(),
        }
    }

    /// Build a dataset from column names and untyped-by-schema values, inferring each column's
    /// type from the values it holds.
    ///
    /// Columns mixing integers and floats become `Float64`; any other mix becomes `Utf8` with
    /// every non-null cell rendered as text.
    pub fn from_values(names: Vec<String>, mut rows: Vec<Vec<Value>>) -> Self {
        let mut fields = Vec::with_capacity(names.len());
        for (idx, name) in names.into_iter().enumerate() {
            let data_type = unify_column(&mut rows, idx);
            fields.push(Field::new(name, data_type));
        }
        Self::new(Schema::new(fields), rows)
    }

    /// Approximate in-memory footprint in bytes.
    pub fn approx_size(&self) -> usize {
        let names: usize = self.schema.fields.iter().map(|f| f.name.capacity()).sum();
        let cells: usize = self
            .rows
            .iter()
            .flat_map(|row| row.iter())
            .map(Value::approx_size)
            .sum();
        names + cells
    }
}

fn unify_column(rows: &mut [Vec<Value>], idx: usize) -> DataType {
    let mut seen: Option<DataType> = None;
    let mut mixed_numeric = false;
    let mut mixed_other = false;

    for value in rows.iter().filter_map(|row| row.get(idx)) {
        let t = match value {
            Value::Null => continue,
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::Bool(_) => DataType::Bool,
            Value::Utf8(_) => DataType::Utf8,
            Value::Date(_) => DataType::Date,
            Value::DateTime(_) => DataType::DateTime,
        };
        match seen {
            None => seen = Some(t),
            Some(prev) if prev == t => {}
            Some(prev) if prev.is_numeric() && t.is_numeric() => mixed_numeric = true,
            Some(_) => mixed_other = true,
        }
    }

    let data_type = if mixed_other {
        DataType::Utf8
    } else if mixed_numeric {
        DataType::Float64
    } else {
        seen.unwrap_or(DataType::Float64)
    };

    for row in rows.iter_mut() {
        if let Some(cell) = row.get_mut(idx) {
            *cell = coerce(std::mem::replace(cell, Value::Null), data_type);
        }
    }
    data_type
}

/// Convert a value into the representation used by a column of `data_type`.
///
/// Used when a column's type is widened; values that cannot be represented become text.
pub fn coerce(value: Value, data_type: DataType) -> Value {
    match (value, data_type) {
        (Value::Null, _) => Value::Null,
        (Value::Int64(v), DataType::Float64) => Value::Float64(v as f64),
        (v @ Value::Utf8(_), DataType::Utf8) => v,
        (v, DataType::Utf8) => Value::Utf8(v.to_string()),
        (v, _) => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_display_keeps_trailing_zero() {
        assert_eq!(Value::Float64(3.0).to_string(), "3.0");
        assert_eq!(Value::Float64(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn from_values_widens_mixed_numeric_columns() {
        let ds = DataSet::from_values(
            vec!["n".to_string(), "x".to_string()],
            vec![
                vec![Value::Int64(1), Value::Int64(1)],
                vec![Value::Float64(2.5), Value::Utf8("b".to_string())],
                vec![Value::Null, Value::Null],
            ],
        );
        assert_eq!(ds.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(ds.schema.fields[1].data_type, DataType::Utf8);
        assert_eq!(ds.rows[0][0], Value::Float64(1.0));
        assert_eq!(ds.rows[0][1], Value::Utf8("1".to_string()));
        assert_eq!(ds.rows[2][1], Value::Null);
    }

    #[test]
    fn all_null_column_defaults_to_float() {
        let ds = DataSet::from_values(vec!["a".to_string()], vec![vec![Value::Null]]);
        assert_eq!(ds.schema.fields[0].data_type, DataType::Float64);
    }

    #[test]
    fn compare_orders_numbers_across_int_and_float() {
        assert_eq!(Value::Int64(2).compare(&Value::Float64(1.5)), Ordering::Greater);
        assert_eq!(Value::Null.compare(&Value::Int64(0)), Ordering::Greater);
    }

    #[test]
    fn float_keys_treat_signed_zero_as_equal() {
        assert_eq!(Value::Float64(0.0).key(), Value::Float64(-0.0).key());
    }
}
