//! Core types for extended-unrar

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One volume of a (possibly multi-volume) RAR archive found on disk
///
/// Identity is the path. Candidates are produced by the scanner and handed to an
/// [`Extractor`](crate::extraction::Extractor) unchanged.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchivePart(PathBuf);

impl ArchivePart {
    /// Wrap a path judged to be an archive part
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Path of the archive part
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Consume the candidate and return its path
    pub fn into_path(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ArchivePart {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for ArchivePart {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl std::fmt::Display for ArchivePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Result of running the extraction tool on one archive part
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Tool exited with 0 (extracted) or 10 (nothing to do)
    Success,
    /// Tool exited with any other status, was killed, or could not be launched
    Failure {
        /// Human-readable reason (exit code or launch error)
        reason: String,
    },
}

impl ExtractionOutcome {
    /// Exit status the tool uses for a successful extraction
    pub const EXIT_OK: i32 = 0;
    /// Exit status the tool uses for "no files to extract"
    pub const EXIT_NOTHING_TO_DO: i32 = 10;

    /// Classify a numeric exit status
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            Self::EXIT_OK | Self::EXIT_NOTHING_TO_DO => ExtractionOutcome::Success,
            other => ExtractionOutcome::Failure {
                reason: format!("returncode {}", other),
            },
        }
    }

    /// Returns true for [`ExtractionOutcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success)
    }
}

/// Overall state of one run; once `Failed` it never returns to `Clean`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// No extraction or deletion error so far
    #[default]
    Clean,
    /// At least one extraction or deletion error occurred
    Failed,
}

impl RunStatus {
    /// Mark the run as failed
    pub fn fail(&mut self) {
        *self = RunStatus::Failed;
    }

    /// Returns true if no error has been recorded
    pub fn is_clean(&self) -> bool {
        matches!(self, RunStatus::Clean)
    }
}

/// What a finished engine run reports back to the caller
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Final run status
    pub status: RunStatus,
    /// Archive parts successfully extracted, in invocation order
    pub extracted: Vec<PathBuf>,
    /// Leftover archive parts that were removed
    pub deleted: Vec<PathBuf>,
    /// Number of scan rounds that found at least one candidate
    pub rounds: usize,
}

impl RunSummary {
    /// Map the run to the exit signal the host understands
    pub fn exit_code(&self) -> PostProcessExit {
        match self.status {
            RunStatus::Clean => PostProcessExit::Success,
            RunStatus::Failed => PostProcessExit::None,
        }
    }
}

/// Exit codes understood by NZBGet post-processing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostProcessExit {
    /// Post-processing succeeded
    Success,
    /// Post-processing failed
    Error,
    /// Nothing was done, or the result is inconclusive
    None,
}

impl PostProcessExit {
    /// Numeric process exit code for the host
    pub fn code(self) -> i32 {
        match self {
            PostProcessExit::Success => 93,
            PostProcessExit::Error => 94,
            PostProcessExit::None => 95,
        }
    }
}

impl From<PostProcessExit> for std::process::ExitCode {
    fn from(exit: PostProcessExit) -> Self {
        // 93..=95 always fit in a u8
        std::process::ExitCode::from(exit.code() as u8)
    }
}
