use std::path::PathBuf;

use thiserror::Error;

/// Why the rent dataset could not be loaded.
///
/// Never fatal: the cache substitutes an empty table and keeps the error for
/// display.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("dataset file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported dataset format '.{extension}' ({path})")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to read spreadsheet {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("spreadsheet {path} has no worksheet")]
    NoWorksheet { path: PathBuf },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read parquet {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("failed to decode record batch in {path}: {source}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed dataset {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}
