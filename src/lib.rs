//! Thread Downloader Core Library
//!
//! Downloads every media attachment of a single imageboard thread into
//! `downloads/{board}/{thread}/`, skipping files that are already present.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Thread-link validation
//! - [`thread`] - Thread metadata model and client
//! - [`storage`] - File presence and free disk space
//! - [`capacity`] - Pre-flight disk space estimate
//! - [`download`] - Attachment naming and streaming downloads
//! - [`pipeline`] - Orchestration of a whole run

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capacity;
pub mod config;
pub mod download;
pub mod error;
pub mod exit;
pub mod parser;
pub mod pipeline;
pub mod storage;
pub mod thread;
mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use capacity::CapacityPlan;
pub use config::{FailurePolicy, NamingScheme, RunConfig, Verbosity};
pub use download::{AttachmentFetcher, DownloadError, FetchOutcome, HttpClient};
pub use error::PipelineError;
pub use exit::{ProcessExit, determine_exit_outcome, exit_for_summary};
pub use parser::{ParseError, ThreadReference};
pub use pipeline::{Pipeline, RunState, RunSummary};
pub use storage::{DiskInspector, LocalDisk, StorageError};
pub use thread::{Attachment, Post, ThreadClient, ThreadError, ThreadMetadata};
