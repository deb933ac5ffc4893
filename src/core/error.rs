use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the collector, checker, patcher and backup store.
///
/// The orchestration layers (engine, CLI handlers) wrap these in
/// `anyhow::Error` with additional context.
#[derive(Debug, Error)]
pub enum FixerError {
    /// The directory handed to the collector is not absolute.
    /// Raised before the filesystem is touched.
    #[error("path must be absolute: {}", path.display())]
    InvalidArgument { path: PathBuf },

    /// A target or backup file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backup write, restore write or commit write failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backup file could not be removed once it was no longer needed.
    #[error("failed to remove backup {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory walk hit an unreadable entry.
    #[error("failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// The configuration was rejected by the validator.
    #[error("invalid configuration: {}", .0.join("; "))]
    Config(Vec<String>),
}

pub type Result<T> = std::result::Result<T, FixerError>;

impl FixerError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixerError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixerError::Write {
            path: path.into(),
            source,
        }
    }
}
