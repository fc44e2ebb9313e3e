//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use thread_dl_core::config::{DEFAULT_BASE_URL, FailurePolicy, NamingScheme, RunConfig, Verbosity};

/// Download all media attachments of an imageboard thread.
///
/// Files are stored under DIR/downloads/{board}/{thread subject}/. Files that
/// already exist are skipped, so an interrupted run can simply be repeated.
#[derive(Parser, Debug)]
#[command(name = "thread-dl")]
#[command(author, version, about)]
pub struct Args {
    /// URL of the thread, e.g. https://kohlchan.net/tech/res/12345.html
    pub thread: String,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Remove non-essential logging (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Use thread ids and file ids instead of subject and original file name
    #[arg(short = 'b', long)]
    pub use_board_ids: bool,

    /// Skip the comparison of the total media size against free disk space
    #[arg(short = 'o', long)]
    pub omit_size_check: bool,

    /// Keep downloading the remaining files after one fails
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Directory in which the downloads/ folder is created
    #[arg(short = 'd', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Base URL of the board serving thread metadata and media
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

impl Args {
    /// Converts parsed arguments into the run configuration.
    pub fn into_config(self) -> RunConfig {
        RunConfig {
            naming: if self.use_board_ids {
                NamingScheme::BoardId
            } else {
                NamingScheme::OriginalName
            },
            skip_capacity_check: self.omit_size_check,
            failure_policy: if self.keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::HaltRemaining
            },
            verbosity: Verbosity::from_flags(self.quiet, self.verbose),
            base_url: self.base_url,
            output_dir: self.output_dir,
        }
    }
}
