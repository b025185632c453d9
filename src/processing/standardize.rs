//! Text normalization of column values.

use std::fmt;

use crate::error::{CleaningError, CleaningResult};
use crate::types::{DataSet, DataType, Value};

use super::ColumnSelection;

/// A string operation applied cell by cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    Lower,
    Upper,
    Trim,
    /// Upper-case the first letter of every word and lower-case the rest.
    Title,
}

impl StringOp {
    /// Parse an operation name (`lower`, `upper`, `trim` or `title`).
    pub fn parse(name: &str) -> CleaningResult<Self> {
        match name {
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            "trim" => Ok(Self::Trim),
            "title" => Ok(Self::Title),
            other => Err(CleaningError::UnknownOperation(other.to_owned())),
        }
    }

    /// Apply the operation to one string.
    pub fn apply(&self, s: &str) -> String {
        match self {
            Self::Lower => s.to_lowercase(),
            Self::Upper => s.to_uppercase(),
            Self::Trim => s.trim().to_owned(),
            Self::Title => title_case(s),
        }
    }
}

impl fmt::Display for StringOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Trim => "trim",
            Self::Title => "title",
        })
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_alphabetic();
    }
    out
}

/// Apply `op` to the selected columns in place and return the names of the columns touched.
///
/// [`ColumnSelection::All`] selects every `Utf8` column. Named columns that are missing are
/// skipped; named columns of another type are rendered to text and become `Utf8`. Nulls stay null.
pub fn standardize(dataset: &mut DataSet, op: StringOp, columns: &ColumnSelection) -> Vec<String> {
    let idxs: Vec<usize> = match columns {
        ColumnSelection::All => dataset
            .schema
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.data_type == DataType::Utf8)
            .map(|(i, _)| i)
            .collect(),
        named => named.resolve_lenient(dataset),
    };

    let mut applied = Vec::with_capacity(idxs.len());
    for idx in idxs {
        dataset.schema.fields[idx].data_type = DataType::Utf8;
        for row in &mut dataset.rows {
            let Some(cell) = row.get_mut(idx) else {
                continue;
            };
            if let Some(text) = cell.to_text() {
                *cell = Value::Utf8(op.apply(&text));
            }
        }
        applied.push(dataset.schema.fields[idx].name.clone());
    }
    applied
}
