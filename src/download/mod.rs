//! Attachment download: naming, HTTP streaming and the per-file step.
//!
//! # Example
//!
//! ```no_run
//! use thread_dl_core::config::NamingScheme;
//! use thread_dl_core::download::{AttachmentFetcher, HttpClient};
//! use thread_dl_core::storage::LocalDisk;
//! use thread_dl_core::thread::Attachment;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = AttachmentFetcher::new(
//!     HttpClient::new()?,
//!     "https://kohlchan.net",
//!     NamingScheme::OriginalName,
//! );
//! let attachment = Attachment {
//!     path: "/.media/abc.png".to_string(),
//!     original_name: "cat.png".to_string(),
//!     size: 1024,
//! };
//! let outcome = fetcher
//!     .fetch_one(Path::new("./downloads/b/1"), &attachment, &LocalDisk)
//!     .await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod fetcher;
mod filename;

pub use client::{HttpClient, build_client};
pub use error::DownloadError;
pub use fetcher::{AttachmentFetcher, FetchOutcome};
pub use filename::{attachment_file_name, thread_dir_name};
