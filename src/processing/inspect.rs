//! Structural and quality summary of a dataset.

use indexmap::IndexMap;
use serde::Serialize;

use crate::ingestion::json::to_records;
use crate::types::DataSet;

use super::dedup::{duplicate_mask, Keep};

/// Row and column counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

/// Result of [`inspect()`]. Serializes with keys in declaration order and columns in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub shape: Shape,
    pub columns: Vec<String>,
    /// Column name to type name.
    pub dtypes: IndexMap<String, String>,
    /// Column name to null count.
    pub missing_values: IndexMap<String, usize>,
    /// Column name to null percentage, rounded to two decimals.
    pub missing_percentages: IndexMap<String, f64>,
    /// Rows equal to an earlier row over all columns.
    pub duplicate_rows: usize,
    /// Approximate in-memory size, e.g. `"1.25 KB"`.
    pub memory_usage: String,
    /// Leading rows as JSON records.
    pub sample_data: Vec<serde_json::Value>,
    /// `"inline"` or the resolved path.
    pub source: String,
}

impl InspectReport {
    /// Pretty-printed JSON rendering.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Summarize `dataset`, including its first `sample_rows` rows.
pub fn inspect(dataset: &DataSet, sample_rows: usize) -> InspectReport {
    let rows = dataset.row_count();
    let mut dtypes = IndexMap::new();
    let mut missing_values = IndexMap::new();
    let mut missing_percentages = IndexMap::new();

    for (idx, field) in dataset.schema.fields.iter().enumerate() {
        let nulls = dataset.null_count(idx);
        let pct = if rows == 0 {
            0.0
        } else {
            (nulls as f64 / rows as f64 * 10_000.0).round() / 100.0
        };
        dtypes.insert(field.name.clone(), field.data_type.name().to_owned());
        missing_values.insert(field.name.clone(), nulls);
        missing_percentages.insert(field.name.clone(), pct);
    }

    let all: Vec<usize> = (0..dataset.column_count()).collect();
    let duplicate_rows = duplicate_mask(dataset, &all, Keep::First)
        .into_iter()
        .filter(|dup| *dup)
        .count();

    InspectReport {
        shape: Shape {
            rows,
            columns: dataset.column_count(),
        },
        columns: dataset.column_names(),
        dtypes,
        missing_values,
        missing_percentages,
        duplicate_rows,
        memory_usage: format!("{:.2} KB", dataset.approx_size() as f64 / 1024.0),
        sample_data: to_records(&dataset.head(sample_rows)),
        source: dataset.origin.to_string(),
    }
}
