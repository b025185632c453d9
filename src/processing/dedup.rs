//! Duplicate detection and removal.

use std::collections::HashMap;
use std::fmt;

use crate::error::{CleaningError, CleaningResult};
use crate::types::{DataSet, ValueKey};

use super::ColumnSelection;

/// Which rows of a duplicate group survive [`dedup()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Keep {
    /// Keep the first occurrence.
    #[default]
    First,
    /// Keep the last occurrence.
    Last,
    /// Drop every row that has a duplicate.
    None,
}

impl Keep {
    /// Parse a keep policy (`first`, `last` or `none`).
    pub fn parse(name: &str) -> CleaningResult<Self> {
        match name {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "none" => Ok(Self::None),
            other => Err(CleaningError::UnknownKeep(other.to_owned())),
        }
    }
}

impl fmt::Display for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::First => "first",
            Self::Last => "last",
            Self::None => "none",
        })
    }
}

/// Mark rows that are duplicates on the key columns `idxs`.
///
/// With [`Keep::First`] every occurrence after the first is marked, with [`Keep::Last`] every
/// occurrence before the last, and with [`Keep::None`] every member of a group with more than
/// one row.
pub fn duplicate_mask(dataset: &DataSet, idxs: &[usize], keep: Keep) -> Vec<bool> {
    let keys: Vec<Vec<ValueKey>> = dataset
        .rows
        .iter()
        .map(|row| idxs.iter().filter_map(|&i| row.get(i)).map(|v| v.key()).collect())
        .collect();

    let mut counts: HashMap<&[ValueKey], usize> = HashMap::new();
    for key in &keys {
        *counts.entry(key.as_slice()).or_insert(0) += 1;
    }

    let mut seen: HashMap<&[ValueKey], usize> = HashMap::new();
    keys.iter()
        .map(|key| {
            let total = counts[key.as_slice()];
            let nth = seen.entry(key.as_slice()).or_insert(0);
            *nth += 1;
            match keep {
                Keep::First => *nth > 1,
                Keep::Last => *nth < total,
                Keep::None => total > 1,
            }
        })
        .collect()
}

/// Returns a new [`DataSet`] with duplicate rows removed.
///
/// Rows are compared over all columns for [`ColumnSelection::All`], otherwise over the named
/// columns, which must exist.
pub fn dedup(dataset: &DataSet, columns: &ColumnSelection, keep: Keep) -> CleaningResult<DataSet> {
    let idxs = columns.resolve_strict(dataset)?;
    let mask = duplicate_mask(dataset, &idxs, keep);
    let mut drop = mask.into_iter();
    Ok(dataset.filter_rows(|_| !drop.next().unwrap_or(false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::csv::{read_csv_from_str, CsvOptions};
    use crate::types::Value;

    fn sample() -> DataSet {
        read_csv_from_str("k,v\na,1\nb,2\na,3\na,1\nc,4\n", &CsvOptions::default()).unwrap()
    }

    fn values(ds: &DataSet) -> Vec<i64> {
        ds.column(1)
            .map(|v| match v {
                Value::Int64(n) => *n,
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn full_row_duplicates_keep_first() {
        let out = dedup(&sample(), &ColumnSelection::All, Keep::First).unwrap();
        assert_eq!(values(&out), vec![1, 2, 3, 4]);
    }

    #[test]
    fn subset_keys_keep_last() {
        let cols = ColumnSelection::Named(vec!["k".to_string()]);
        let out = dedup(&sample(), &cols, Keep::Last).unwrap();
        assert_eq!(values(&out), vec![2, 1, 4]);
    }

    #[test]
    fn keep_none_removes_every_group_member() {
        let cols = ColumnSelection::Named(vec!["k".to_string()]);
        let out = dedup(&sample(), &cols, Keep::None).unwrap();
        assert_eq!(values(&out), vec![2, 4]);
    }

    #[test]
    fn nulls_compare_equal() {
        let ds = read_csv_from_str("a,b\n1,\n1,\n", &CsvOptions::default()).unwrap();
        assert_eq!(duplicate_mask(&ds, &[0, 1], Keep::First), vec![false, true]);
    }

    #[test]
    fn parse_keep_rejects_unknown_values() {
        assert_eq!(Keep::parse("last").unwrap(), Keep::Last);
        assert!(matches!(Keep::parse("all"), Err(CleaningError::UnknownKeep(_))));
    }
}
