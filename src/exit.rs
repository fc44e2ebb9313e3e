//! Process exit outcome of a run.

use std::process::ExitCode;

use crate::pipeline::RunSummary;

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Every attachment is on disk.
    Success,
    /// Some attachments are on disk, at least one failed.
    Partial,
    /// Fatal error, interrupt, or nothing but failures.
    Failure,
}

impl ProcessExit {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial => 1,
            Self::Failure => 2,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Determines the process exit outcome from completed and failed attachment counts.
#[must_use]
pub fn determine_exit_outcome(completed: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if completed > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

/// Exit outcome for a finished run.
#[must_use]
pub fn exit_for_summary(summary: &RunSummary) -> ProcessExit {
    determine_exit_outcome(summary.completed(), summary.failed)
}
