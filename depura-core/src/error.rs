//! Fatal errors.
//!
//! Anything here aborts the run. Problems scoped to a single record are
//! reported through [`depura_types::RecordError`] instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a cleaning run.
#[derive(Error, Debug)]
pub enum Error {
    /// A stopword lexicon file could not be read.
    #[error("failed to load {source_name} lexicon from {path}: {error}")]
    Lexicon {
        /// Which lexicon was being loaded.
        source_name: &'static str,
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        error: std::io::Error,
    },
    /// A stopword lexicon file had no usable entries.
    #[error("{source_name} lexicon at {path} contains no words")]
    EmptyLexicon {
        /// Which lexicon was being loaded.
        source_name: &'static str,
        /// File that was empty.
        path: PathBuf,
    },
    /// The input table has no column with the requested name.
    #[error("column {column:?} not found in {path} (available: {available})")]
    MissingColumn {
        /// Requested column.
        column: String,
        /// Input file.
        path: PathBuf,
        /// Comma-separated header names.
        available: String,
    },
    /// The output column already exists in the input table.
    #[error("column {0:?} already exists in the input table")]
    DuplicateColumn(String),
    /// The number of cleaned texts does not match the number of rows.
    #[error("cannot write {cleaned} cleaned texts into a table of {rows} rows")]
    RowCountMismatch {
        /// Rows in the table.
        rows: usize,
        /// Cleaned texts supplied.
        cleaned: usize,
    },
    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    /// Reading or writing the table failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Any other I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
