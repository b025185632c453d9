//! The cleaning operations as one typed entrypoint.
//!
//! Every operation follows the same pipeline: resolve the source into a [`DataSet`], apply an
//! in-memory transform from [`crate::processing`], then either persist the result to the
//! destination or render a preview of its leading rows.

use std::path::Path;

use crate::error::{CleaningError, CleaningResult};
use crate::ingestion::{resolve, write_dataset, LoadOptions};
use crate::processing::{
    self, render_preview, ColumnSelection, FillStrategy, FilterOperator, InspectReport, Keep,
    StringOp,
};
use crate::report::{
    DedupReport, DropNullsReport, FillNullsReport, FilterReport, Output, StandardizeReport,
};
use crate::types::DataSet;

/// Options for [`Cleaner`].
#[derive(Debug, Clone)]
pub struct CleanerOptions {
    /// How sources are resolved and loaded.
    pub load: LoadOptions,
    /// Rows included in previews when no destination is given.
    pub preview_rows: usize,
    /// Rows included as `sample_data` by [`Cleaner::inspect`].
    pub sample_rows: usize,
}

impl Default for CleanerOptions {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            preview_rows: 5,
            sample_rows: 3,
        }
    }
}

/// Runs cleaning operations against source references.
///
/// Each call loads its own dataset; a `Cleaner` holds configuration only.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    options: CleanerOptions,
}

impl Cleaner {
    pub fn new(options: CleanerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CleanerOptions {
        &self.options
    }

    /// Load `source` and summarize it.
    pub fn inspect(&self, source: &str) -> CleaningResult<InspectReport> {
        let dataset = self.load(source)?;
        Ok(processing::inspect(&dataset, self.options.sample_rows))
    }

    /// Drop rows holding a null in any selected column.
    pub fn drop_nulls(
        &self,
        source: &str,
        columns: &ColumnSelection,
        destination: Option<&Path>,
    ) -> CleaningResult<DropNullsReport> {
        let dataset = self.load(source)?;
        let cleaned = processing::drop_nulls(&dataset, columns)?;
        let removed = dataset.row_count() - cleaned.row_count();
        tracing::info!(removed, remaining = cleaned.row_count(), "dropped rows with nulls");
        Ok(DropNullsReport {
            removed,
            remaining: cleaned.row_count(),
            output: self.emit(&cleaned, destination)?,
        })
    }

    /// Impute nulls in the selected columns.
    pub fn fill_nulls(
        &self,
        source: &str,
        strategy: &FillStrategy,
        columns: &ColumnSelection,
        destination: Option<&Path>,
    ) -> CleaningResult<FillNullsReport> {
        let mut dataset = self.load(source)?;
        let filled = processing::fill_nulls(&mut dataset, strategy, columns);
        tracing::info!(%strategy, filled, "filled missing values");
        Ok(FillNullsReport {
            strategy: strategy.name().to_owned(),
            filled,
            output: self.emit(&dataset, destination)?,
        })
    }

    /// Remove duplicate rows, comparing the selected columns.
    pub fn dedup(
        &self,
        source: &str,
        columns: &ColumnSelection,
        keep: Keep,
        destination: Option<&Path>,
    ) -> CleaningResult<DedupReport> {
        let dataset = self.load(source)?;
        let cleaned = processing::dedup(&dataset, columns, keep)?;
        let removed = dataset.row_count() - cleaned.row_count();
        tracing::info!(%keep, removed, "removed duplicate rows");
        Ok(DedupReport {
            removed,
            remaining: cleaned.row_count(),
            output: self.emit(&cleaned, destination)?,
        })
    }

    /// Apply a string operation to the selected columns.
    pub fn standardize(
        &self,
        source: &str,
        op: StringOp,
        columns: &ColumnSelection,
        destination: Option<&Path>,
    ) -> CleaningResult<StandardizeReport> {
        let mut dataset = self.load(source)?;
        let applied = processing::standardize(&mut dataset, op, columns);
        tracing::info!(operation = %op, columns = ?applied, "standardized columns");
        Ok(StandardizeReport {
            operation: op.to_string(),
            columns: applied,
            output: self.emit(&dataset, destination)?,
        })
    }

    /// Keep the rows whose `column` satisfies `op` against `value`.
    pub fn filter_rows(
        &self,
        source: &str,
        column: &str,
        op: FilterOperator,
        value: &str,
        destination: Option<&Path>,
    ) -> CleaningResult<FilterReport> {
        let dataset = self.load(source)?;
        let filtered = processing::filter_rows(&dataset, column, op, value)?;
        tracing::info!(column, operator = %op, kept = filtered.row_count(), "filtered rows");
        Ok(FilterReport {
            kept: filtered.row_count(),
            original: dataset.row_count(),
            output: self.emit(&filtered, destination)?,
        })
    }

    fn load(&self, source: &str) -> CleaningResult<DataSet> {
        let dataset = resolve(source, &self.options.load)?;
        tracing::debug!(
            origin = %dataset.origin,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "loaded source"
        );
        Ok(dataset)
    }

    fn emit(&self, dataset: &DataSet, destination: Option<&Path>) -> CleaningResult<Output> {
        match destination {
            Some(dest) => {
                let path = self.options.load.anchor(dest);
                write_dataset(dataset, &path).map_err(|cause| CleaningError::Write {
                    path: path.clone(),
                    cause,
                })?;
                tracing::debug!(path = %path.display(), rows = dataset.row_count(), "wrote result");
                Ok(Output::Written(dest.to_path_buf()))
            }
            None => Ok(Output::Preview(render_preview(
                &dataset.head(self.options.preview_rows),
            ))),
        }
    }
}
