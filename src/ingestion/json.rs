//! JSON reading and writing.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object (one row)
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns are the union of object keys in first-seen order; absent keys are null. Nested objects
//! and arrays are kept as their JSON text.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexSet;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Value};

/// Read a JSON or NDJSON file into an in-memory [`DataSet`].
pub fn read_json_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    read_json_from_str(&text)
}

/// Read JSON from an in-memory string into a [`DataSet`].
pub fn read_json_from_str(input: &str) -> IngestionResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::EmptyInput);
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => records_to_dataset(&items),
            serde_json::Value::Object(_) => records_to_dataset(std::slice::from_ref(&v)),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                IngestionError::SchemaMismatch {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        records_to_dataset(&values)
    }
}

fn records_to_dataset(values: &[serde_json::Value]) -> IngestionResult<DataSet> {
    let mut columns: IndexSet<String> = IndexSet::new();
    let mut objects = Vec::with_capacity(values.len());
    for (idx0, v) in values.iter().enumerate() {
        let obj = v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("row {} is not a json object", idx0 + 1),
        })?;
        for key in obj.keys() {
            columns.insert(key.clone());
        }
        objects.push(obj);
    }
    if columns.is_empty() {
        return Err(IngestionError::EmptyInput);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|name| obj.get(name).map(convert_json_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(DataSet::from_values(columns.into_iter().collect(), rows))
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        nested => Value::Utf8(nested.to_string()),
    }
}

fn record(dataset: &DataSet, row: &[Value]) -> serde_json::Map<String, serde_json::Value> {
    dataset
        .schema
        .field_names()
        .zip(row.iter())
        .map(|(name, v)| (name.to_owned(), v.to_json()))
        .collect()
}

/// Rows as JSON objects keyed by column name, in column order.
pub fn to_records(dataset: &DataSet) -> Vec<serde_json::Value> {
    dataset
        .rows
        .iter()
        .map(|row| serde_json::Value::Object(record(dataset, row)))
        .collect()
}

fn ensure_records(dataset: &DataSet, path: &Path) -> IngestionResult<()> {
    if dataset.rows.is_empty() {
        return Err(IngestionError::NoRecords {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Write the dataset as a pretty-printed JSON array of records.
///
/// Fails with [`IngestionError::NoRecords`] (creating no file) when the dataset has no rows.
pub fn write_json_to_path(dataset: &DataSet, path: impl AsRef<Path>) -> IngestionResult<()> {
    let path = path.as_ref();
    ensure_records(dataset, path)?;
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &to_records(dataset))?;
    out.flush()?;
    Ok(())
}

/// Write the dataset as NDJSON, one record per line.
///
/// Like [`write_json_to_path`], refuses datasets with no rows.
pub fn write_ndjson_to_path(dataset: &DataSet, path: impl AsRef<Path>) -> IngestionResult<()> {
    let path = path.as_ref();
    ensure_records(dataset, path)?;
    let mut out = BufWriter::new(File::create(path)?);
    for row in &dataset.rows {
        serde_json::to_writer(&mut out, &record(dataset, row))?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    #[test]
    fn reads_array_with_union_of_keys() {
        let ds = read_json_from_str(r#"[{"a":1,"b":"x"},{"a":2.5,"c":true}]"#).unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b", "c"]);
        assert_eq!(ds.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(ds.rows[0][0], Value::Float64(1.0));
        assert_eq!(ds.rows[1][1], Value::Null);
        assert_eq!(ds.rows[1][2], Value::Bool(true));
    }

    #[test]
    fn reads_ndjson() {
        let ds = read_json_from_str("{\"id\":1}\n\n{\"id\":2}\n").unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
    }

    #[test]
    fn rejects_scalar_documents() {
        let err = read_json_from_str("42").unwrap_err();
        assert!(err.to_string().contains("schema mismatch"));
    }

    #[test]
    fn records_preserve_column_order() {
        let ds = read_json_from_str(r#"[{"z":1,"a":2}]"#).unwrap();
        let records = to_records(&ds);
        assert_eq!(records[0].to_string(), r#"{"z":1,"a":2}"#);
    }
}
