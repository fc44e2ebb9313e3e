//! Pre-flight estimate of whether the pending attachments fit on disk.
//!
//! The estimate is taken once before downloading. Nothing is reserved, so
//! other writers on the same filesystem can still exhaust it mid-run.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, instrument};

use crate::config::NamingScheme;
use crate::download::attachment_file_name;
use crate::storage::{DiskInspector, StorageError};
use crate::thread::Attachment;

/// Bytes per MiB, used for log output.
const BYTES_PER_MIB: f64 = 1_048_576.0;

/// Result of a capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    /// Sum of the sizes of attachments not yet on disk.
    pub required_bytes: u64,
    /// Free bytes on the target filesystem when the plan was made.
    pub free_bytes: u64,
    /// `required_bytes <= free_bytes`.
    pub sufficient: bool,
}

impl CapacityPlan {
    #[must_use]
    pub fn new(required_bytes: u64, free_bytes: u64) -> Self {
        Self {
            required_bytes,
            free_bytes,
            sufficient: required_bytes <= free_bytes,
        }
    }

    #[must_use]
    pub fn required_mib(&self) -> f64 {
        to_mib(self.required_bytes)
    }

    #[must_use]
    pub fn free_mib(&self) -> f64 {
        to_mib(self.free_bytes)
    }
}

/// MiB rounded to two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_mib(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MIB * 100.0).round() / 100.0
}

/// Sums the sizes of attachments whose local file is missing and compares
/// the total to the free space of `target_dir`.
///
/// A local name shared by several attachments is counted once, since only the
/// first of them will be written. Attachments without a derivable name are
/// left out; they fail in the download phase.
///
/// # Errors
///
/// Returns [`StorageError::FreeSpace`] when free space cannot be queried.
#[instrument(skip_all, fields(target_dir = %target_dir.display(), ?naming))]
pub fn plan<'a, D>(
    target_dir: &Path,
    attachments: impl IntoIterator<Item = &'a Attachment>,
    naming: NamingScheme,
    disk: &D,
) -> Result<CapacityPlan, StorageError>
where
    D: DiskInspector + ?Sized,
{
    let mut counted = HashSet::new();
    let mut required_bytes: u64 = 0;

    for attachment in attachments {
        let Some(name) = attachment_file_name(attachment, naming) else {
            continue;
        };
        if !counted.insert(name.clone()) {
            continue;
        }
        if disk.exists(&target_dir.join(&name)) {
            debug!(file = %name, "already present, not counted");
            continue;
        }
        required_bytes = required_bytes.saturating_add(attachment.size);
    }

    let free_bytes = disk.free_bytes(target_dir)?;
    Ok(CapacityPlan::new(required_bytes, free_bytes))
}
