//! Recursive RAR extraction
//!
//! This module finds RAR volumes that are still lying in a download directory,
//! hands each one to an external extraction tool and keeps rescanning until a
//! scan comes back empty, so archives unpacked out of other archives are picked
//! up too. Extracted volumes can optionally be deleted afterwards.

mod cleanup;
mod cli;
mod engine;
mod scanner;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

// Re-exports
pub use cleanup::remove_leftover;
pub use cli::{CliExtractor, Extractor};
pub use engine::{ExtractionEngine, RunContext};
pub use scanner::{is_archive_part, scan_archive_parts};
