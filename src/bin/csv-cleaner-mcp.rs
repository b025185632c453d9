//! Stdio tool server for the CSV cleaning operations.
//!
//! Reads one JSON-RPC request per line on stdin and writes responses to stdout. Logs go to stderr;
//! set `RUST_LOG=debug` for per-request events.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use csv_cleaner::cleaner::{Cleaner, CleanerOptions};
use csv_cleaner::ingestion::{CompositeObserver, FileObserver, LoadObserver, TracingObserver};
use csv_cleaner::server::Server;
use csv_cleaner::tools::CleaningTools;

#[derive(Debug, Parser)]
#[command(name = "csv-cleaner-mcp", version, about = "CSV data cleaning tool server (JSON-RPC over stdio)")]
struct Cli {
    /// Fallback directories probed for relative source paths, in order.
    #[arg(long = "base-dir", env = "CSV_CLEANER_BASE_DIRS", value_delimiter = ',')]
    base_dirs: Vec<PathBuf>,

    /// Directory relative sources and destinations are resolved against.
    #[arg(long, env = "CSV_CLEANER_WORKDIR")]
    workdir: Option<PathBuf>,

    /// Append load events to this file.
    #[arg(long, env = "CSV_CLEANER_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// CSV field separator.
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Rows shown in previews when no output path is given.
    #[arg(long, default_value_t = 5)]
    preview_rows: usize,
}

impl Cli {
    fn into_options(self) -> Result<CleanerOptions> {
        ensure!(
            self.delimiter.is_ascii(),
            "delimiter must be a single ASCII character, got {:?}",
            self.delimiter
        );

        let mut options = CleanerOptions {
            preview_rows: self.preview_rows,
            ..CleanerOptions::default()
        };
        options.load.csv.delimiter = self.delimiter as u8;
        if !self.base_dirs.is_empty() {
            options.load.base_dirs = self.base_dirs;
        }
        options.load.working_dir = self.workdir;

        let tracing_observer: Arc<dyn LoadObserver> = Arc::new(TracingObserver);
        options.load.observer = Some(match self.log_file {
            Some(path) => Arc::new(CompositeObserver::new(vec![
                tracing_observer,
                Arc::new(FileObserver::new(path)),
            ])),
            None => tracing_observer,
        });
        Ok(options)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = Cli::parse().into_options()?;
    tracing::debug!(?options, "starting");
    let server = Server::new(CleaningTools::new(Cleaner::new(options)));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    server
        .serve(stdin.lock(), stdout.lock())
        .context("stdio transport failed")
}
