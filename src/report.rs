//! Typed results of cleaning operations and their text rendering.

use std::fmt;
use std::path::PathBuf;

/// Where a transformed dataset went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Persisted to this path.
    Written(PathBuf),
    /// Not persisted; rendered preview of the leading rows.
    Preview(String),
}

impl Output {
    /// Append the output-specific tail of a message: `. Saved to <path>` or the preview block.
    fn write_tail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Written(path) => write!(f, ". Saved to {}", path.display()),
            Output::Preview(preview) => write!(f, "\n\nPreview:\n{preview}"),
        }
    }
}

/// Result of dropping rows with nulls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropNullsReport {
    pub removed: usize,
    pub remaining: usize,
    pub output: Output,
}

impl fmt::Display for DropNullsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.output {
            Output::Written(path) => write!(
                f,
                "Removed {} rows with null values. Saved to {}. Remaining rows: {}",
                self.removed,
                path.display(),
                self.remaining
            ),
            Output::Preview(preview) => write!(
                f,
                "Removed {} rows. Remaining: {} rows\n\nPreview:\n{preview}",
                self.removed, self.remaining
            ),
        }
    }
}

/// Result of imputing nulls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillNullsReport {
    /// Strategy name as given.
    pub strategy: String,
    /// Number of cells that were null before and hold a value now.
    pub filled: usize,
    pub output: Output,
}

impl fmt::Display for FillNullsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Filled {} missing values using '{}' strategy",
            self.filled, self.strategy
        )?;
        self.output.write_tail(f)
    }
}

/// Result of removing duplicate rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupReport {
    pub removed: usize,
    pub remaining: usize,
    pub output: Output,
}

impl fmt::Display for DedupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.output {
            Output::Written(path) => write!(
                f,
                "Removed {} duplicate rows. Saved to {}. Remaining rows: {}",
                self.removed,
                path.display(),
                self.remaining
            ),
            Output::Preview(preview) => write!(
                f,
                "Removed {} duplicate rows. Remaining: {} rows\n\nPreview:\n{preview}",
                self.removed, self.remaining
            ),
        }
    }
}

/// Result of normalizing text columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardizeReport {
    /// Operation name as given.
    pub operation: String,
    /// Columns the operation was applied to, in application order.
    pub columns: Vec<String>,
    pub output: Output,
}

impl fmt::Display for StandardizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Applied '{}' to columns: {}",
            self.operation,
            self.columns.join(", ")
        )?;
        self.output.write_tail(f)
    }
}

/// Result of filtering rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReport {
    pub kept: usize,
    pub original: usize,
    pub output: Output,
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filtered to {} rows (from {})", self.kept, self.original)?;
        self.output.write_tail(f)
    }
}
