//! # extended-unrar
//!
//! NZBGet post-processing extension that extracts RAR archives NZBGet's own
//! unpack step left behind, including archives that only appear after another
//! archive has been extracted.
//!
//! ## How a run works
//!
//! 1. [`preflight`] validates the NZBGet environment and waits for NZBGet's
//!    own cleanup if configured.
//! 2. [`extraction::ExtractionEngine`] scans the download directory for RAR
//!    volumes, runs unrar on each and rescans until nothing new shows up.
//! 3. Extracted volumes are deleted if `DeleteLeftover` is enabled.
//! 4. The outcome is mapped to NZBGet's exit codes (93 success, 94 error,
//!    95 nothing done / inconclusive).
//!
//! ## Quick Start
//!
//! ```no_run
//! use extended_unrar::config::HostOptions;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> std::process::ExitCode {
//!     extended_unrar::logging::init();
//!     extended_unrar::run(&HostOptions::from_env()).await.into()
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Host configuration
pub mod config;
/// Error types
pub mod error;
/// Archive discovery and extraction
pub mod extraction;
/// NZBGet log formatting
pub mod logging;
/// Extension manifest
pub mod manifest;
/// Environment checks before extraction
pub mod preflight;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{ExtractionConfig, HostOptions};
pub use error::{Error, PostProcessError, Result};
pub use extraction::{CliExtractor, ExtractionEngine, Extractor};
pub use preflight::{Preflight, run_preflight};
pub use types::{ArchivePart, ExtractionOutcome, PostProcessExit, RunStatus, RunSummary};

use std::sync::Arc;
use tracing::error;

/// Run the whole extension against the given host options
///
/// Host misconfiguration is logged and reported as [`PostProcessExit::Error`].
pub async fn run(options: &HostOptions) -> PostProcessExit {
    let config = match run_preflight(options).await {
        Ok(Preflight::Proceed(config)) => config,
        Ok(Preflight::Exit(exit)) => return exit,
        Err(e) => {
            // Config messages are already worded for the NZBGet log, so they
            // go out without the error kind in front
            match e {
                Error::Config { message, .. } => error!("{}", message),
                other => error!("{}", other),
            }
            return PostProcessExit::Error;
        }
    };

    let extractor = Arc::new(CliExtractor::from_config(&config));
    let summary = ExtractionEngine::new(config, extractor).run().await;

    summary.exit_code()
}
