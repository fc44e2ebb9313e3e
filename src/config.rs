//! Per-run configuration.
//!
//! A [`RunConfig`] is built once from the command line and handed to every
//! pipeline stage. Nothing mutates it after construction.

use std::path::PathBuf;

/// Default imageboard host serving both thread metadata and media.
pub const DEFAULT_BASE_URL: &str = "https://kohlchan.net";

/// Directory (below the output root) that holds all thread folders.
pub const DOWNLOADS_DIR: &str = "downloads";

/// How local directory and file names are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingScheme {
    /// Thread subject for the directory, `originalName` for files.
    #[default]
    OriginalName,
    /// Numeric thread id for the directory, board-assigned id for files.
    BoardId,
}

/// What to do with the rest of the attachment list after one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop after the first failed attachment.
    #[default]
    HaltRemaining,
    /// Log the failure and move on to the next attachment.
    Continue,
}

/// Log verbosity requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    #[default]
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    /// Maps quiet/verbose flags to a verbosity. `quiet` wins over `verbose`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// Default `tracing` filter directive for this verbosity.
    #[must_use]
    pub fn default_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Verbose => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Configuration for a single pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub naming: NamingScheme,
    pub skip_capacity_check: bool,
    pub failure_policy: FailurePolicy,
    pub verbosity: Verbosity,
    /// Scheme and host used for both the metadata and the media endpoint.
    pub base_url: String,
    /// Root under which `downloads/{board}/{thread}` is created.
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            naming: NamingScheme::default(),
            skip_capacity_check: false,
            failure_policy: FailurePolicy::default(),
            verbosity: Verbosity::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl RunConfig {
    /// Base URL without a trailing slash, ready for path concatenation.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Directory that holds every thread folder of `board`.
    #[must_use]
    pub fn board_dir(&self, board: &str) -> PathBuf {
        self.output_dir.join(DOWNLOADS_DIR).join(board)
    }
}
