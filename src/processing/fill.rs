//! Imputing null values.

use std::fmt;

use crate::error::{CleaningError, CleaningResult};
use crate::ingestion::csv::parse_cell;
use crate::types::{coerce, DataSet, DataType, Value};

use super::reduce::{reduce_at, ReduceOp};
use super::ColumnSelection;

/// How missing values are imputed.
#[derive(Debug, Clone, PartialEq)]
pub enum FillStrategy {
    /// Column mean (numeric columns only).
    Mean,
    /// Column median (numeric columns only).
    Median,
    /// Most frequent value; the smallest one on ties.
    Mode,
    /// Propagate the last valid value forward.
    Forward,
    /// Propagate the next valid value backward.
    Backward,
    /// A caller-supplied constant.
    Constant(String),
}

impl FillStrategy {
    /// Parse a strategy name. `constant` requires `fill_value`; it is ignored otherwise.
    pub fn parse(name: &str, fill_value: Option<&str>) -> CleaningResult<Self> {
        match name {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "constant" => fill_value
                .map(|v| Self::Constant(v.to_owned()))
                .ok_or_else(|| CleaningError::MissingArgument {
                    argument: "fill_value".to_string(),
                    reason: "strategy is 'constant'".to_string(),
                }),
            other => Err(CleaningError::UnknownStrategy(other.to_owned())),
        }
    }

    /// The strategy's wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Constant(_) => "constant",
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fill nulls in the selected columns in place and return how many cells were filled.
///
/// Named columns that do not exist are skipped, as are columns without nulls. `mean` and
/// `median` leave non-numeric columns untouched; `mode` leaves all-null columns untouched.
pub fn fill_nulls(dataset: &mut DataSet, strategy: &FillStrategy, columns: &ColumnSelection) -> usize {
    let mut filled = 0;
    for idx in columns.resolve_lenient(dataset) {
        if dataset.null_count(idx) == 0 {
            continue;
        }
        let before = dataset.null_count(idx);
        match strategy {
            FillStrategy::Mean => fill_with_statistic(dataset, idx, ReduceOp::Mean),
            FillStrategy::Median => fill_with_statistic(dataset, idx, ReduceOp::Median),
            FillStrategy::Mode => {
                let mode = reduce_at(dataset, idx, ReduceOp::Mode);
                fill_constant_value(dataset, idx, &mode);
            }
            FillStrategy::Forward => propagate(dataset, idx, false),
            FillStrategy::Backward => propagate(dataset, idx, true),
            FillStrategy::Constant(raw) => fill_with_text(dataset, idx, raw),
        }
        filled += before - dataset.null_count(idx);
    }
    filled
}

fn fill_with_statistic(dataset: &mut DataSet, idx: usize, op: ReduceOp) {
    let Value::Float64(stat) = reduce_at(dataset, idx, op) else {
        return;
    };
    let value = if dataset.schema.fields[idx].data_type == DataType::Int64 && stat.fract() == 0.0 {
        Value::Int64(stat as i64)
    } else {
        set_column_type(dataset, idx, DataType::Float64);
        Value::Float64(stat)
    };
    fill_constant_value(dataset, idx, &value);
}

fn fill_with_text(dataset: &mut DataSet, idx: usize, raw: &str) {
    let data_type = dataset.schema.fields[idx].data_type;
    let value = match parse_cell(raw, data_type) {
        Some(v) => v,
        None => {
            set_column_type(dataset, idx, DataType::Utf8);
            Value::Utf8(raw.to_owned())
        }
    };
    fill_constant_value(dataset, idx, &value);
}

fn fill_constant_value(dataset: &mut DataSet, idx: usize, value: &Value) {
    if value.is_null() {
        return;
    }
    for row in &mut dataset.rows {
        if let Some(cell) = row.get_mut(idx) {
            if cell.is_null() {
                *cell = value.clone();
            }
        }
    }
}

fn propagate(dataset: &mut DataSet, idx: usize, backward: bool) {
    let mut last: Option<Value> = None;
    let mut step = |row: &mut Vec<Value>| {
        if let Some(cell) = row.get_mut(idx) {
            if cell.is_null() {
                if let Some(v) = &last {
                    *cell = v.clone();
                }
            } else {
                last = Some(cell.clone());
            }
        }
    };
    if backward {
        dataset.rows.iter_mut().rev().for_each(&mut step);
    } else {
        dataset.rows.iter_mut().for_each(&mut step);
    }
}

fn set_column_type(dataset: &mut DataSet, idx: usize, data_type: DataType) {
    if dataset.schema.fields[idx].data_type == data_type {
        return;
    }
    dataset.schema.fields[idx].data_type = data_type;
    for row in &mut dataset.rows {
        if let Some(cell) = row.get_mut(idx) {
            *cell = coerce(std::mem::replace(cell, Value::Null), data_type);
        }
    }
}
