//! Local disk state: file presence and free space.
//!
//! Presence on disk is the only record of what was downloaded before, so
//! every query goes straight to the filesystem.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised when the target filesystem cannot be queried or written.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Target directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Free space of the filesystem holding `path` could not be determined.
    #[error("cannot determine free space for {path}: {source}")]
    FreeSpace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Path the failing operation was applied to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDir { path, .. } | Self::FreeSpace { path, .. } => path,
        }
    }
}

/// Read access to the filesystem as seen by the pipeline.
pub trait DiskInspector {
    /// Whether `path` currently exists.
    fn exists(&self, path: &Path) -> bool;

    /// Bytes available to this process on the filesystem holding `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::FreeSpace`] when the filesystem cannot be queried.
    fn free_bytes(&self, path: &Path) -> Result<u64, StorageError>;
}

/// [`DiskInspector`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDisk;

impl DiskInspector for LocalDisk {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn free_bytes(&self, path: &Path) -> Result<u64, StorageError> {
        fs2::available_space(path).map_err(|source| StorageError::FreeSpace {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Creates `dir` and all missing parents.
///
/// # Errors
///
/// Returns [`StorageError::CreateDir`] when creation fails.
pub async fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}
