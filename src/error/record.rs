use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Unknown field '{field}' in '{source_name}'.")]
    UnknownField { field: String, source_name: String },
    #[error("Input '{path}' has no header line.")]
    MissingHeader { path: PathBuf },
    #[error("Failed to open input '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read input '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Input '{path}' was read before it was opened.")]
    NotOpened { path: PathBuf },
}
