//! Source resolution: turning a caller-supplied source reference into a [`DataSet`].
//!
//! A source reference is either inline CSV content or a locator for a stored file. Which one it
//! is gets decided heuristically:
//!
//! 1. If the reference contains a line break and its first line contains the field separator,
//!    it is parsed as inline CSV.
//! 2. Otherwise (or if that parse fails) it is treated as a path. Absolute paths are read as-is;
//!    relative paths are tried against the working directory, then against each fallback base
//!    directory in order, and finally read literally.
//! 3. If reading the path fails, the reference gets one last chance as inline CSV before the
//!    path error is surfaced. A single line that names no readable file therefore loads as a
//!    header-only dataset.
//!
//! Known limitation: a path whose first line contains the separator (which requires an embedded
//! line break) is always tried as inline content first.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{CleaningError, CleaningResult, IngestionError, IngestionResult};
use crate::types::{DataSet, Origin};

use super::csv::{read_csv_from_path, read_csv_from_str, CsvOptions};
use super::json::read_json_from_path;
use super::observability::{severity_for_error, LoadContext, LoadObserver, LoadSeverity, LoadStats};
use super::parquet::read_parquet_from_path;

/// Fallback directories probed, in order, for relative locators.
pub const DEFAULT_BASE_DIRS: &[&str] = &[".", "./data", "../data", "./datasets"];

/// Formats a stored source can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values (also the format of all inline content).
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Apache Parquet.
    Parquet,
}

impl SourceFormat {
    /// Parse a source format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "json" | "ndjson" | "jsonl" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }

    /// Format for a path; unknown or missing extensions are read as CSV.
    pub fn for_path(path: &Path) -> Self {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
            .unwrap_or(Self::Csv)
    }
}

/// Options controlling source resolution.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// CSV parsing options, shared by inline content and CSV files.
    pub csv: CsvOptions,
    /// Fallback base directories probed for relative locators.
    pub base_dirs: Vec<PathBuf>,
    /// Directory relative locators and relative base directories are anchored to.
    ///
    /// If `None`, the process working directory is used.
    pub working_dir: Option<PathBuf>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("csv", &self.csv)
            .field("base_dirs", &self.base_dirs)
            .field("working_dir", &self.working_dir)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            csv: CsvOptions::default(),
            base_dirs: DEFAULT_BASE_DIRS.iter().map(PathBuf::from).collect(),
            working_dir: None,
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

impl LoadOptions {
    pub(crate) fn anchor(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.working_dir {
            Some(dir) => dir.join(path),
            None => std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf()),
        }
    }

    fn report(&self, ctx: &LoadContext, result: &IngestionResult<DataSet>) {
        let Some(obs) = self.observer.as_ref() else {
            return;
        };
        match result {
            Ok(ds) => obs.on_success(
                ctx,
                LoadStats {
                    rows: ds.row_count(),
                    columns: ds.column_count(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(ctx, sev, e);
                if sev >= self.alert_at_or_above {
                    obs.on_alert(ctx, sev, e);
                }
            }
        }
    }
}

/// Returns true if `source` should first be tried as inline content: it has a line break and
/// its first line contains the separator.
pub fn looks_inline(source: &str, delimiter: u8) -> bool {
    match source.find('\n') {
        Some(pos) => source.as_bytes()[..pos].contains(&delimiter),
        None => false,
    }
}

/// Resolve a relative locator to the path that will be read.
///
/// Absolute locators are returned unchanged. Relative ones are tried against the working
/// directory, then each base directory; the first existing file wins. If nothing exists the
/// anchored literal locator is returned so the read reports a meaningful error.
pub fn locate(locator: &str, options: &LoadOptions) -> PathBuf {
    let path = Path::new(locator);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let direct = options.anchor(path);
    if direct.is_file() {
        return direct;
    }

    for base in &options.base_dirs {
        let candidate = options.anchor(&base.join(path));
        tracing::trace!(candidate = %candidate.display(), "probing base directory");
        if candidate.is_file() {
            return candidate;
        }
    }

    direct
}

/// Resolve a source reference into a dataset.
///
/// See the [module docs](self) for the disambiguation rules. The surfaced error on failure is
/// the path-read error, wrapped as [`CleaningError::Load`].
pub fn resolve(source: &str, options: &LoadOptions) -> CleaningResult<DataSet> {
    let inline_first = looks_inline(source, options.csv.delimiter);
    if inline_first {
        match load_inline(source, options) {
            Ok(ds) => return Ok(ds),
            Err(e) => tracing::debug!(error = %e, "inline parse failed, trying as a path"),
        }
    }

    let path = locate(source, options);
    match load_path(&path, options) {
        Ok(ds) => Ok(ds),
        Err(path_err) => {
            // A single line still parses, as a header with no rows.
            if !inline_first {
                if let Ok(ds) = load_inline(source, options) {
                    return Ok(ds);
                }
            }
            Err(CleaningError::Load {
                reference: source.to_owned(),
                cause: path_err,
            })
        }
    }
}

/// Parse inline CSV content.
pub fn load_inline(content: &str, options: &LoadOptions) -> IngestionResult<DataSet> {
    let ctx = LoadContext {
        origin: Origin::Inline,
        format: SourceFormat::Csv,
    };
    let result = read_csv_from_str(content, &options.csv);
    options.report(&ctx, &result);
    result
}

/// Read a stored source, choosing the reader from the file extension.
pub fn load_path(path: &Path, options: &LoadOptions) -> IngestionResult<DataSet> {
    let format = SourceFormat::for_path(path);
    let ctx = LoadContext {
        origin: Origin::Path(path.to_path_buf()),
        format,
    };
    let result = match format {
        SourceFormat::Csv => read_csv_from_path(path, &options.csv),
        SourceFormat::Json => read_json_from_path(path),
        SourceFormat::Parquet => read_parquet_from_path(path),
    }
    .map(|ds| ds.with_origin(Origin::Path(path.to_path_buf())));
    options.report(&ctx, &result);
    result
}

/// Formats a dataset can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// CSV with a header row.
    Csv,
    /// Pretty-printed JSON array of records.
    Json,
    /// One JSON record per line.
    Ndjson,
}

impl OutputFormat {
    /// Output format for a destination path; unknown or missing extensions write CSV.
    pub fn for_path(path: &Path) -> IngestionResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("ndjson") | Some("jsonl") => Ok(Self::Ndjson),
            Some(ext @ ("parquet" | "pq")) => Err(IngestionError::UnsupportedFormat {
                format: ext.to_owned(),
                path: path.to_path_buf(),
            }),
            _ => Ok(Self::Csv),
        }
    }
}

/// Write a dataset to `path`, choosing the writer from the file extension.
pub fn write_dataset(dataset: &DataSet, path: &Path) -> IngestionResult<()> {
    match OutputFormat::for_path(path)? {
        OutputFormat::Csv => super::csv::write_csv_to_path(dataset, path),
        OutputFormat::Json => super::json::write_json_to_path(dataset, path),
        OutputFormat::Ndjson => super::json::write_ndjson_to_path(dataset, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_with_separator_is_inline() {
        assert!(looks_inline("a,b\n1,2", b','));
        assert!(!looks_inline("data.csv", b','));
        assert!(!looks_inline("a,b", b','));
        assert!(!looks_inline("a\n1,2", b','));
    }

    #[test]
    fn extension_selects_format() {
        assert_eq!(SourceFormat::for_path(Path::new("x.JSON")), SourceFormat::Json);
        assert_eq!(SourceFormat::for_path(Path::new("x.pq")), SourceFormat::Parquet);
        assert_eq!(SourceFormat::for_path(Path::new("x")), SourceFormat::Csv);
        assert_eq!(OutputFormat::for_path(Path::new("out.jsonl")).unwrap(), OutputFormat::Ndjson);
        assert!(OutputFormat::for_path(Path::new("out.parquet")).is_err());
    }

    #[test]
    fn absolute_locators_are_not_rewritten() {
        let abs = std::env::temp_dir().join("nowhere.csv");
        let located = locate(abs.to_str().unwrap(), &LoadOptions::default());
        assert_eq!(located, abs);
    }

    #[test]
    fn inline_content_resolves_without_touching_disk() {
        let ds = resolve("a,b\n1,2\n", &LoadOptions::default()).unwrap();
        assert_eq!(ds.origin, Origin::Inline);
        assert_eq!(ds.row_count(), 1);
    }

    #[test]
    fn single_line_source_loads_as_header_only() {
        let ds = resolve("a,b", &LoadOptions::default()).unwrap();
        assert_eq!(ds.origin, Origin::Inline);
        assert_eq!(ds.column_names(), vec!["a", "b"]);
        assert_eq!(ds.row_count(), 0);
    }

    #[test]
    fn empty_source_is_a_load_error() {
        let err = resolve("", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, CleaningError::Load { .. }));
    }
}
