//! `csv-cleaner` is a small library for cleaning tabular data held in CSV (and JSON/Parquet)
//! sources, plus a tool server that exposes the operations to a remote caller.
//!
//! The primary entrypoint is [`cleaner::Cleaner`]. Every operation takes a *source reference*,
//! which is either inline CSV content or a path to a stored file, and resolves it into an
//! in-memory [`types::DataSet`] before transforming it.
//!
//! ## Operations
//!
//! - **inspect**: shape, column types, null counts/percentages, duplicate rows, a sample
//! - **drop nulls**: remove rows holding nulls (in any column or in selected ones)
//! - **fill nulls**: impute with `mean`, `median`, `mode`, `forward`, `backward` or `constant`
//! - **dedup**: remove duplicate rows keeping the `first`, the `last` or `none`
//! - **standardize**: `lower`, `upper`, `trim` or `title` case text columns
//! - **filter**: keep rows matching `equals`, `not_equals`, `greater`, `less`, `contains` or
//!   `not_contains`
//!
//! Each transform either writes its result to a destination (format chosen by extension) or
//! returns a text preview of the leading rows.
//!
//! ## Source references
//!
//! A reference whose first line contains the separator is parsed as inline CSV. Anything else is
//! a locator: absolute paths are read directly; relative ones are probed against the working
//! directory and a list of fallback base directories (see [`ingestion::DEFAULT_BASE_DIRS`]).
//!
//! **File formats (by extension):**
//!
//! - **CSV**: `.csv`, `.txt`, and anything unrecognized
//! - **JSON**: `.json` (array-of-objects) and `.ndjson`/`.jsonl` (newline-delimited objects)
//! - **Parquet**: `.parquet`, `.pq` (read-only)
//!
//! Column types are inferred per column: [`types::DataType::Int64`], [`types::DataType::Float64`],
//! [`types::DataType::Bool`], [`types::DataType::Date`], [`types::DataType::DateTime`], otherwise
//! [`types::DataType::Utf8`]. Empty cells and the usual missing-value markers (`NA`, `NaN`,
//! `null`, ...) map to [`types::Value::Null`].
//!
//! ## Quick example
//!
//! ```rust
//! use csv_cleaner::cleaner::Cleaner;
//! use csv_cleaner::processing::{ColumnSelection, Keep};
//!
//! # fn main() -> Result<(), csv_cleaner::CleaningError> {
//! let cleaner = Cleaner::default();
//! let report = cleaner.dedup("id,name\n1,a\n1,a\n2,b\n", &ColumnSelection::All, Keep::First, None)?;
//! assert_eq!(report.removed, 1);
//! assert_eq!(report.remaining, 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Tool server
//!
//! [`tools::CleaningTools`] maps the operations onto named tools with JSON input schemas, and
//! [`server::Server`] speaks line-delimited JSON-RPC over any `BufRead`/`Write` pair. The
//! `csv-cleaner-mcp` binary wires both to stdin/stdout.
//!
//! ## Modules
//!
//! - [`ingestion`]: source resolution, format readers/writers and load observers
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: in-memory dataset transformations
//! - [`cleaner`]: load, transform, persist-or-preview pipeline
//! - [`report`]: typed operation results and their text rendering
//! - [`tools`] / [`server`]: the remote tool surface
//! - [`error`]: error types used across the crate

pub mod cleaner;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod report;
pub mod server;
pub mod tools;
pub mod types;

pub use cleaner::{Cleaner, CleanerOptions};
pub use error::{CleaningError, CleaningResult, IngestionError, IngestionResult};
