//! Fatal errors of a pipeline run.
//!
//! Any of these ends the run; per-attachment failures are reported through
//! [`FetchOutcome`](crate::download::FetchOutcome) instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;
use crate::pipeline::RunState;
use crate::storage::StorageError;
use crate::thread::ThreadError;

/// Errors that abort a run before or instead of downloading.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Thread link is malformed. Raised before any I/O.
    #[error("thread argument is not a valid thread link: {0}")]
    InvalidInput(#[from] ParseError),

    /// Thread metadata could not be retrieved or decoded.
    #[error("thread metadata unavailable: {0}")]
    RemoteUnavailable(#[from] ThreadError),

    /// Pre-flight estimate exceeds free disk space.
    #[error(
        "combined size of the attachments planned for download ({required_mib:.2} MiB) exceeds free disk capacity ({free_mib:.2} MiB)"
    )]
    InsufficientStorage {
        required_bytes: u64,
        free_bytes: u64,
        required_mib: f64,
        free_mib: f64,
    },

    /// Target directory cannot be created or queried.
    #[error("storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    /// The pipeline already started a run; each run needs a fresh one.
    #[error("pipeline already used (state: {state}); create a new pipeline for another run")]
    AlreadyRun { state: RunState },
}

impl PipelineError {
    /// Creates an `InsufficientStorage` error from raw byte counts.
    #[must_use]
    pub fn insufficient_storage(required_bytes: u64, free_bytes: u64) -> Self {
        Self::InsufficientStorage {
            required_bytes,
            free_bytes,
            required_mib: crate::capacity::to_mib(required_bytes),
            free_mib: crate::capacity::to_mib(free_bytes),
        }
    }
}

impl From<StorageError> for PipelineError {
    fn from(source: StorageError) -> Self {
        Self::StorageUnavailable {
            path: source.path().to_path_buf(),
            source,
        }
    }
}
