//! Dropping rows that contain nulls.

use crate::error::CleaningResult;
use crate::types::{DataSet, Value};

use super::ColumnSelection;

/// Returns a new [`DataSet`] without the rows that hold a null in any of the selected columns.
///
/// With [`ColumnSelection::All`] every column is checked. Named columns must exist.
pub fn drop_nulls(dataset: &DataSet, columns: &ColumnSelection) -> CleaningResult<DataSet> {
    let idxs = columns.resolve_strict(dataset)?;
    Ok(dataset.filter_rows(|row| {
        !idxs
            .iter()
            .any(|&i| row.get(i).is_none_or(Value::is_null))
    }))
}
