//! Loading datasets from source references and writing them back out.
//!
//! Most callers should use [`resolve`] (from [`resolver`]) which:
//!
//! - decides whether a source reference is inline CSV content or a file locator
//! - probes fallback base directories for relative locators
//! - reads the file with the reader its extension selects
//! - optionally reports every attempt to a [`LoadObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`] (read-only)

pub mod csv;
pub mod json;
pub mod observability;
pub mod parquet;
pub mod resolver;

pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, TracingObserver,
};
pub use resolver::{
    load_inline, load_path, locate, looks_inline, resolve, write_dataset, LoadOptions, OutputFormat, SourceFormat,
    DEFAULT_BASE_DIRS,
};
