//! Orchestration of one thread download.
//!
//! A run moves strictly forward through
//! `Idle → ValidatingInput → FetchingMetadata → CheckingCapacity → Downloading → Done`.
//! Validation, metadata retrieval and the capacity check can end in
//! `Aborted`; nothing ever returns to an earlier state.
//!
//! # Example
//!
//! ```no_run
//! use thread_dl_core::config::RunConfig;
//! use thread_dl_core::pipeline::Pipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = Pipeline::new(RunConfig::default())?;
//! let summary = pipeline
//!     .run_url("https://kohlchan.net/tech/res/12345.html")
//!     .await?;
//! println!("downloaded {} files", summary.downloaded);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::capacity::{self, CapacityPlan};
use crate::config::{FailurePolicy, RunConfig};
use crate::download::{
    AttachmentFetcher, DownloadError, FetchOutcome, HttpClient, build_client, thread_dir_name,
};
use crate::error::PipelineError;
use crate::parser::ThreadReference;
use crate::storage::{self, DiskInspector, LocalDisk};
use crate::thread::{ThreadClient, ThreadMetadata};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Idle,
    ValidatingInput,
    FetchingMetadata,
    CheckingCapacity,
    Downloading,
    Done,
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ValidatingInput => "validating-input",
            Self::FetchingMetadata => "fetching-metadata",
            Self::CheckingCapacity => "checking-capacity",
            Self::Downloading => "downloading",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Totals of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Directory the attachments were written to.
    pub thread_dir: PathBuf,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Attachments left untouched because the run halted.
    pub not_attempted: usize,
    pub bytes_downloaded: u64,
    /// Whether a failure stopped the remaining downloads.
    pub halted: bool,
    /// Capacity estimate, `None` when the check was skipped.
    pub capacity: Option<CapacityPlan>,
}

impl RunSummary {
    fn new(thread_dir: PathBuf, capacity: Option<CapacityPlan>) -> Self {
        Self {
            thread_dir,
            downloaded: 0,
            skipped: 0,
            failed: 0,
            not_attempted: 0,
            bytes_downloaded: 0,
            halted: false,
            capacity,
        }
    }

    /// Attachments that are on disk after the run (downloaded now or before).
    #[must_use]
    pub fn completed(&self) -> usize {
        self.downloaded + self.skipped
    }
}

/// Drives a single thread download.
#[derive(Debug)]
pub struct Pipeline<D = LocalDisk> {
    config: RunConfig,
    thread_client: ThreadClient,
    fetcher: AttachmentFetcher,
    disk: D,
    state: RunState,
}

impl Pipeline<LocalDisk> {
    /// Creates a pipeline working on the local filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] when the HTTP client cannot be built.
    pub fn new(config: RunConfig) -> Result<Self, DownloadError> {
        Self::with_disk(config, LocalDisk)
    }
}

impl<D: DiskInspector> Pipeline<D> {
    /// Creates a pipeline with a custom disk inspector.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] when the HTTP client cannot be built.
    pub fn with_disk(config: RunConfig, disk: D) -> Result<Self, DownloadError> {
        let client = build_client()?;
        let thread_client = ThreadClient::new(client.clone(), config.base_url());
        let fetcher = AttachmentFetcher::new(
            HttpClient::from_client(client),
            config.base_url(),
            config.naming,
        );
        Ok(Self {
            config,
            thread_client,
            fetcher,
            disk,
            state: RunState::Idle,
        })
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Parses `thread_url` and runs the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] without touching the network
    /// when the link is malformed, otherwise the errors of [`Self::run`].
    pub async fn run_url(&mut self, thread_url: &str) -> Result<RunSummary, PipelineError> {
        self.begin()?;
        info!(url = %thread_url.trim(), "downloading media from thread URL");

        let thread = match ThreadReference::parse(thread_url) {
            Ok(thread) => thread,
            Err(err) => return Err(self.abort(err.into())),
        };
        info!(board = %thread.board(), thread = %thread.thread_id(), "thread link accepted");

        self.download_thread(&thread).await
    }

    /// Fetches metadata, checks capacity and downloads every attachment.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::RemoteUnavailable`] when metadata cannot be fetched
    /// - [`PipelineError::StorageUnavailable`] when the thread directory cannot
    ///   be created or its free space cannot be read
    /// - [`PipelineError::InsufficientStorage`] when the estimate exceeds free space
    /// - [`PipelineError::AlreadyRun`] when this pipeline was used before
    pub async fn run(&mut self, thread: &ThreadReference) -> Result<RunSummary, PipelineError> {
        self.begin()?;
        self.download_thread(thread).await
    }

    /// A pipeline drives exactly one run; later calls are refused.
    fn begin(&mut self) -> Result<(), PipelineError> {
        if self.state != RunState::Idle {
            return Err(PipelineError::AlreadyRun { state: self.state });
        }
        self.transition(RunState::ValidatingInput);
        Ok(())
    }

    async fn download_thread(
        &mut self,
        thread: &ThreadReference,
    ) -> Result<RunSummary, PipelineError> {
        self.transition(RunState::FetchingMetadata);
        let metadata = match self.thread_client.fetch(thread).await {
            Ok(metadata) => metadata,
            Err(err) => return Err(self.abort(err.into())),
        };

        self.transition(RunState::CheckingCapacity);
        let dir_name = thread_dir_name(thread, &metadata, self.config.naming);
        let thread_dir = self.config.board_dir(thread.board()).join(&dir_name);
        info!(dir = %dir_name, "saving files for thread");

        if let Err(err) = storage::ensure_dir(&thread_dir).await {
            return Err(self.abort(err.into()));
        }
        let capacity_plan = match self.check_capacity(&thread_dir, &metadata) {
            Ok(capacity_plan) => capacity_plan,
            Err(err) => return Err(self.abort(err)),
        };

        self.transition(RunState::Downloading);
        let mut summary = RunSummary::new(thread_dir, capacity_plan);
        self.download_all(&metadata, &mut summary).await;

        self.transition(RunState::Done);
        info!(
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            not_attempted = summary.not_attempted,
            mib = capacity::to_mib(summary.bytes_downloaded),
            "thread finished"
        );
        Ok(summary)
    }

    fn check_capacity(
        &self,
        thread_dir: &Path,
        metadata: &ThreadMetadata,
    ) -> Result<Option<CapacityPlan>, PipelineError> {
        if self.config.skip_capacity_check {
            info!("omitting size check");
            return Ok(None);
        }

        let plan = capacity::plan(
            thread_dir,
            metadata.attachments(),
            self.config.naming,
            &self.disk,
        )?;
        if !plan.sufficient {
            return Err(PipelineError::insufficient_storage(
                plan.required_bytes,
                plan.free_bytes,
            ));
        }

        info!(free_mib = plan.free_mib(), "free space");
        info!(expected_mib = plan.required_mib(), "expected total");
        Ok(Some(plan))
    }

    async fn download_all(&self, metadata: &ThreadMetadata, summary: &mut RunSummary) {
        let total = metadata.attachment_count();

        for (index, attachment) in metadata.attachments().enumerate() {
            let outcome = self
                .fetcher
                .fetch_one(&summary.thread_dir, attachment, &self.disk)
                .await;
            match outcome {
                FetchOutcome::Downloaded { bytes, .. } => {
                    summary.downloaded += 1;
                    summary.bytes_downloaded = summary.bytes_downloaded.saturating_add(bytes);
                }
                FetchOutcome::Skipped { .. } => summary.skipped += 1,
                FetchOutcome::Failed(_) => {
                    summary.failed += 1;
                    if self.config.failure_policy == FailurePolicy::HaltRemaining {
                        summary.not_attempted = total - index - 1;
                        summary.halted = true;
                        if summary.not_attempted > 0 {
                            warn!(
                                remaining = summary.not_attempted,
                                "stopping after failed attachment; run again to resume"
                            );
                        }
                        break;
                    }
                }
            }
        }
    }

    fn transition(&mut self, next: RunState) {
        debug_assert!(
            next > self.state,
            "run state must move forward: {} -> {next}",
            self.state
        );
        debug!(from = %self.state, to = %next, "run state");
        self.state = next;
    }

    fn abort(&mut self, err: PipelineError) -> PipelineError {
        error!(state = %self.state, "{err}");
        self.transition(RunState::Aborted);
        err
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::capacity::tests::FakeDisk;
    use crate::config::NamingScheme;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use std::collections::HashSet;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const THREAD_JSON: &str = r#"{"subject": "Sample Thread", "posts": [
        {"files": [{"path": "/.media/aaa.png", "originalName": "a.png", "size": 10}]},
        {"files": [
            {"path": "/.media/bbb.png", "originalName": "b.png", "size": 20},
            {"path": "/.media/ccc.png", "originalName": "c.png", "size": 30}
        ]}
    ]}"#;

    fn config(server: &MockServer, output: &TempDir) -> RunConfig {
        RunConfig {
            base_url: server.uri(),
            output_dir: output.path().to_path_buf(),
            ..RunConfig::default()
        }
    }

    async fn mount_thread(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/tech/res/12345.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(THREAD_JSON))
            .mount(server)
            .await;
    }

    async fn mount_media(server: &MockServer, name: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/.media/{name}")))
            .respond_with(ResponseTemplate::new(status).set_body_bytes(name.as_bytes().to_vec()))
            .mount(server)
            .await;
    }

    #[test]
    fn test_run_states_are_ordered() {
        assert!(RunState::Idle < RunState::ValidatingInput);
        assert!(RunState::CheckingCapacity < RunState::Downloading);
        assert!(RunState::Done < RunState::Aborted);
    }

    #[tokio::test]
    async fn test_invalid_url_aborts_without_network() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut pipeline = Pipeline::new(config(&server, &output)).unwrap();
        let result = pipeline
            .run_url("https://kohlchan.net/tech/res/12x45.html")
            .await;

        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
        assert_eq!(pipeline.state(), RunState::Aborted);
        assert!(!output.path().join("downloads").exists());
    }

    #[tokio::test]
    async fn test_full_run_names_directory_after_subject() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        mount_thread(&server).await;
        for name in ["aaa.png", "bbb.png", "ccc.png"] {
            mount_media(&server, name, 200).await;
        }

        let mut pipeline = Pipeline::new(config(&server, &output)).unwrap();
        let summary = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await
            .unwrap();

        let dir = output.path().join("downloads").join("tech").join("Sample Thread");
        assert_eq!(summary.thread_dir, dir);
        assert_eq!(summary.downloaded, 3);
        assert_eq!(pipeline.state(), RunState::Done);
        assert_eq!(std::fs::read(dir.join("b.png")).unwrap(), b"bbb.png");
        assert_eq!(summary.capacity.unwrap().required_bytes, 60);
    }

    #[tokio::test]
    async fn test_board_id_naming_uses_thread_id_and_file_ids() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        mount_thread(&server).await;
        for name in ["aaa.png", "bbb.png", "ccc.png"] {
            mount_media(&server, name, 200).await;
        }

        let config = RunConfig {
            naming: NamingScheme::BoardId,
            ..config(&server, &output)
        };
        let mut pipeline = Pipeline::new(config).unwrap();
        let thread = ThreadReference::new("tech", "12345").unwrap();
        let summary = pipeline.run(&thread).await.unwrap();

        let dir = output.path().join("downloads").join("tech").join("12345");
        assert_eq!(summary.thread_dir, dir);
        assert!(dir.join("aaa.png").exists());
        assert!(!dir.join("a.png").exists());
    }

    #[tokio::test]
    async fn test_halt_policy_stops_after_first_failure() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        mount_thread(&server).await;
        mount_media(&server, "aaa.png", 404).await;
        Mock::given(method("GET"))
            .and(path("/.media/bbb.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut pipeline = Pipeline::new(config(&server, &output)).unwrap();
        let summary = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.downloaded, 0);
        assert_eq!(summary.not_attempted, 2);
        assert!(summary.halted);
        let entries = std::fs::read_dir(&summary.thread_dir).unwrap().count();
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn test_continue_policy_downloads_the_rest() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        mount_thread(&server).await;
        mount_media(&server, "aaa.png", 404).await;
        mount_media(&server, "bbb.png", 200).await;
        mount_media(&server, "ccc.png", 200).await;

        let config = RunConfig {
            failure_policy: FailurePolicy::Continue,
            ..config(&server, &output)
        };
        let mut pipeline = Pipeline::new(config).unwrap();
        let summary = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.downloaded, 2);
        assert!(!summary.halted);
    }

    #[tokio::test]
    async fn test_insufficient_storage_aborts_before_downloading() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        mount_thread(&server).await;
        Mock::given(method("GET"))
            .and(path("/.media/aaa.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let disk = FakeDisk::with_free(59);
        let mut pipeline = Pipeline::with_disk(config(&server, &output), disk).unwrap();
        let result = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await;

        match result {
            Err(PipelineError::InsufficientStorage {
                required_bytes,
                free_bytes,
                ..
            }) => {
                assert_eq!(required_bytes, 60);
                assert_eq!(free_bytes, 59);
            }
            other => panic!("Expected InsufficientStorage, got: {other:?}"),
        }
        assert_eq!(pipeline.state(), RunState::Aborted);
        let thread_dir = output.path().join("downloads/tech/Sample Thread");
        assert_eq!(std::fs::read_dir(&thread_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_skipped_capacity_check_never_queries_free_space() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        mount_thread(&server).await;
        for name in ["aaa.png", "bbb.png", "ccc.png"] {
            mount_media(&server, name, 200).await;
        }

        let disk = FakeDisk {
            present: HashSet::new(),
            free: Err(()),
        };
        let config = RunConfig {
            skip_capacity_check: true,
            ..config(&server, &output)
        };
        let mut pipeline = Pipeline::with_disk(config, disk).unwrap();
        let summary = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await
            .unwrap();

        assert!(summary.capacity.is_none());
        assert_eq!(summary.downloaded, 3);
    }

    #[tokio::test]
    async fn test_metadata_failure_is_remote_unavailable() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/tech/res/12345.json"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let mut pipeline = Pipeline::new(config(&server, &output)).unwrap();
        let result = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await;

        assert!(matches!(result, Err(PipelineError::RemoteUnavailable(_))));
        assert_eq!(pipeline.state(), RunState::Aborted);
    }

    #[tokio::test]
    async fn test_unwritable_output_is_storage_unavailable() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        std::fs::write(output.path().join("downloads"), b"file, not dir").unwrap();
        mount_thread(&server).await;

        let mut pipeline = Pipeline::new(config(&server, &output)).unwrap();
        let result = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await;

        assert!(matches!(
            result,
            Err(PipelineError::StorageUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_finished_pipeline_refuses_second_run() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        mount_thread(&server).await;
        for name in ["aaa.png", "bbb.png", "ccc.png"] {
            mount_media(&server, name, 200).await;
        }

        let mut pipeline = Pipeline::new(config(&server, &output)).unwrap();
        let first = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await
            .unwrap();
        assert_eq!(first.downloaded, 3);
        let requests_after_first = server.received_requests().await.unwrap().len();

        let second = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await;
        assert!(matches!(
            second,
            Err(PipelineError::AlreadyRun {
                state: RunState::Done
            })
        ));

        let thread = ThreadReference::new("tech", "12345").unwrap();
        let third = pipeline.run(&thread).await;
        assert!(matches!(third, Err(PipelineError::AlreadyRun { .. })));

        assert_eq!(pipeline.state(), RunState::Done);
        assert_eq!(
            server.received_requests().await.unwrap().len(),
            requests_after_first
        );
    }

    #[tokio::test]
    async fn test_aborted_pipeline_refuses_retry() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let output = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut pipeline = Pipeline::new(config(&server, &output)).unwrap();
        let bogus = pipeline.run_url("bogus").await;
        assert!(matches!(bogus, Err(PipelineError::InvalidInput(_))));

        let retry = pipeline
            .run_url("https://kohlchan.net/tech/res/12345.html")
            .await;
        assert!(matches!(
            retry,
            Err(PipelineError::AlreadyRun {
                state: RunState::Aborted
            })
        ));
        assert_eq!(pipeline.state(), RunState::Aborted);
    }
}
