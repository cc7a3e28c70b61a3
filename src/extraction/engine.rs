//! Scan/extract rounds driven to a fixed point.

use super::cleanup::remove_leftovers;
use super::cli::Extractor;
use super::scanner::scan_archive_parts;
use crate::config::ExtractionConfig;
use crate::error::PostProcessError;
use crate::types::{ArchivePart, ExtractionOutcome, RunStatus, RunSummary};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

/// State of one engine run
///
/// Owned by a single [`ExtractionEngine::run`] call, so separate runs never
/// share anything.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Parts extracted so far, in invocation order
    extracted: Vec<PathBuf>,
    /// Same paths as `extracted`, for scan exclusion
    processed: HashSet<PathBuf>,
    /// Set once any part was extracted
    extracted_any: bool,
    /// Rounds that found at least one candidate
    rounds: usize,
    /// Sticky failure flag
    status: RunStatus,
}

impl RunContext {
    /// Paths excluded from further scans
    pub fn processed(&self) -> &HashSet<PathBuf> {
        &self.processed
    }

    /// Current run status
    pub fn status(&self) -> RunStatus {
        self.status
    }

    fn mark_extracted(&mut self, part: ArchivePart) {
        let path = part.into_path();
        if self.processed.insert(path.clone()) {
            self.extracted.push(path);
        }
        self.extracted_any = true;
    }
}

/// Drives repeated scan and extract rounds over one directory tree
///
/// # Examples
///
/// ```no_run
/// use extended_unrar::config::ExtractionConfig;
/// use extended_unrar::extraction::{CliExtractor, ExtractionEngine};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = ExtractionConfig::new("unrar x -y -p- -o+", "/downloads/movie")
///     .with_delete_leftover(true);
/// let extractor = Arc::new(CliExtractor::from_config(&config));
/// let summary = ExtractionEngine::new(config, extractor).run().await;
/// println!("exit with {}", summary.exit_code().code());
/// # }
/// ```
pub struct ExtractionEngine {
    config: ExtractionConfig,
    extractor: Arc<dyn Extractor>,
}

impl ExtractionEngine {
    /// Create an engine for the given configuration
    pub fn new(config: ExtractionConfig, extractor: Arc<dyn Extractor>) -> Self {
        Self { config, extractor }
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract until nothing new is found, then remove leftovers if enabled
    ///
    /// Failures never propagate as errors; they flip the run status to
    /// [`RunStatus::Failed`] and are logged.
    pub async fn run(&self) -> RunSummary {
        let mut ctx = RunContext::default();

        self.extract_until_fixed_point(&mut ctx).await;

        let deleted = if self.config.delete_leftover && ctx.extracted_any {
            remove_leftovers(&ctx.extracted, &mut ctx.status).await
        } else {
            Vec::new()
        };

        RunSummary {
            status: ctx.status,
            extracted: ctx.extracted,
            deleted,
            rounds: ctx.rounds,
        }
    }

    /// Run scan/extract rounds until a scan finds nothing new or a part fails
    pub async fn extract_until_fixed_point(&self, ctx: &mut RunContext) {
        let working_dir = &self.config.working_dir;

        debug!(
            ?working_dir,
            extractor = self.extractor.name(),
            "Searching for rar/RAR files"
        );

        loop {
            let candidates = scan_archive_parts(working_dir, &ctx.processed).await;
            if candidates.is_empty() {
                debug!(rounds = ctx.rounds, "no unextracted archives left");
                return;
            }

            ctx.rounds += 1;
            debug!(
                round = ctx.rounds,
                candidates = candidates.len(),
                "starting extraction round"
            );

            for part in candidates {
                info!("Extracting {}", part);

                match self.extractor.extract(&part, working_dir).await {
                    ExtractionOutcome::Success => {
                        info!("Extract Successful");
                        ctx.mark_extracted(part);
                    }
                    ExtractionOutcome::Failure { reason } => {
                        let err = PostProcessError::ExtractionFailed {
                            archive: part.into_path(),
                            reason,
                        };
                        error!("{}", err);
                        ctx.status.fail();
                        return;
                    }
                }
            }
        }
    }
}
