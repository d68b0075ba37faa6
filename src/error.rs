use std::path::PathBuf;
use thiserror::Error;

use crate::types::RunStats;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Input directory does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input directory is not readable: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {} (tried {})", .path.display(), .tried.join(", "))]
    Decode { path: PathBuf, tried: Vec<String> },

    #[error("Failed to write gallery {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl GalleryError {
    /// Per-file errors skip the file; everything else aborts the run
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GalleryError::Read { .. } | GalleryError::Decode { .. })
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

/// A failed run, with the counts gathered before the failure if scanning finished
#[derive(Error, Debug)]
#[error("{error}")]
pub struct RunFailure {
    pub stats: Option<RunStats>,
    pub error: GalleryError,
}

impl From<GalleryError> for RunFailure {
    fn from(error: GalleryError) -> Self {
        Self { stats: None, error }
    }
}
