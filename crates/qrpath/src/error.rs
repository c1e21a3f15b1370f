//! Errors surfaced by the `qrpath` binary.

use std::io;
use std::path::PathBuf;

use qrpath_outline::{GridError, OutlineError};

use crate::encode::EncodeError;

/// Everything that can make a `qrpath` command fail.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The input file does not exist.
    #[error("input file not found: {}", .path.display())]
    MissingInput {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The batch CSV could not be read.
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A payload could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A grid file could not be parsed.
    #[error("parsing grid: {0}")]
    Grid(#[from] GridError),

    /// Rendering failed or the render configuration is invalid.
    #[error(transparent)]
    Outline(#[from] OutlineError),

    /// `--config-json` is not a valid render configuration.
    #[error("parsing --config-json: {0}")]
    Config(#[source] serde_json::Error),

    /// Diagnostics could not be serialized.
    #[error("serializing diagnostics: {0}")]
    Json(#[from] serde_json::Error),

    /// A batch row failed; the batch stops there.
    #[error("row {row}: {source}")]
    Row {
        /// One-based line number of the row in the CSV.
        row: u64,
        /// What went wrong.
        #[source]
        source: Box<Self>,
    },
}

impl CliError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
