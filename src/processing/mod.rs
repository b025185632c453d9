//! In-memory data cleaning transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion and
//! never touches storage itself.
//!
//! Currently implemented:
//!
//! - [`inspect()`]: shape, types, null statistics, duplicates and a sample
//! - [`drop_nulls()`]: remove rows with nulls (in any or in selected columns)
//! - [`fill_nulls()`]: impute nulls with a [`FillStrategy`]
//! - [`dedup()`]: remove duplicate rows with a [`Keep`] policy
//! - [`standardize()`]: apply a [`StringOp`] to text columns
//! - [`filter_rows()`]: keep rows matching a [`FilterOperator`] condition
//! - [`reduce_at()`]: the mean/median/mode statistics behind [`FillStrategy`]
//! - [`render_preview()`]: fixed-width text rendering of leading rows
//!
//! ## Example: drop nulls, then filter
//!
//! ```rust
//! use csv_cleaner::ingestion::{resolve, LoadOptions};
//! use csv_cleaner::processing::{drop_nulls, filter_rows, ColumnSelection, FilterOperator};
//!
//! let ds = resolve("a,b\n1,\n2,3\n,4", &LoadOptions::default()).unwrap();
//! let cleaned = drop_nulls(&ds, &ColumnSelection::All).unwrap();
//! assert_eq!(cleaned.row_count(), 1);
//!
//! let filtered = filter_rows(&ds, "a", FilterOperator::Greater, "1").unwrap();
//! assert_eq!(filtered.row_count(), 1);
//! ```

pub mod dedup;
pub mod fill;
pub mod filter;
pub mod inspect;
pub mod nulls;
pub mod preview;
pub mod reduce;
pub mod standardize;

pub use dedup::{dedup, duplicate_mask, Keep};
pub use fill::{fill_nulls, FillStrategy};
pub use filter::{filter_rows, FilterOperator};
pub use inspect::{inspect, InspectReport, Shape};
pub use nulls::drop_nulls;
pub use preview::render_preview;
pub use reduce::{reduce_at, ReduceOp};
pub use standardize::{standardize, StringOp};

use crate::error::{CleaningError, CleaningResult};
use crate::types::DataSet;

/// Which columns an operation applies to.
///
/// `All` defers to the operation's default rule: every column for null handling and dedup,
/// every text column for [`standardize()`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSelection {
    /// The operation's default column set.
    #[default]
    All,
    /// Explicitly named columns, in the order given, without repeats.
    Named(Vec<String>),
}

impl ColumnSelection {
    /// Parse a comma-separated column list. Elements are trimmed and empty elements dropped; an
    /// absent or empty list selects [`ColumnSelection::All`].
    pub fn parse(list: Option<&str>) -> Self {
        let Some(list) = list else {
            return Self::All;
        };
        let mut names: Vec<String> = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        }
        if names.is_empty() {
            Self::All
        } else {
            Self::Named(names)
        }
    }

    /// Column indexes for the selection, failing on the first name not in the dataset.
    pub(crate) fn resolve_strict(&self, dataset: &DataSet) -> CleaningResult<Vec<usize>> {
        match self {
            Self::All => Ok((0..dataset.column_count()).collect()),
            Self::Named(names) => names
                .iter()
                .map(|name| {
                    dataset
                        .schema
                        .index_of(name)
                        .ok_or_else(|| missing_column(dataset, name))
                })
                .collect(),
        }
    }

    /// Column indexes for the selection, silently skipping names not in the dataset.
    pub(crate) fn resolve_lenient(&self, dataset: &DataSet) -> Vec<usize> {
        match self {
            Self::All => (0..dataset.column_count()).collect(),
            Self::Named(names) => names
                .iter()
                .filter_map(|name| dataset.schema.index_of(name))
                .collect(),
        }
    }
}

pub(crate) fn missing_column(dataset: &DataSet, name: &str) -> CleaningError {
    CleaningError::MissingColumn {
        column: name.to_owned(),
        available: dataset.column_names(),
    }
}
