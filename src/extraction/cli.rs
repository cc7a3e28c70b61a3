//! Extraction through an external unrar binary

use crate::config::{ExtractionConfig, split_command};
use crate::error::{Error, Result};
use crate::types::{ArchivePart, ExtractionOutcome};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::debug;

/// Something that can extract one archive part into a directory
///
/// The engine only looks at the returned outcome. Implementations must not
/// panic; launch problems are reported as [`ExtractionOutcome::Failure`].
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract `archive` into `dest`
    async fn extract(&self, archive: &ArchivePart, dest: &Path) -> ExtractionOutcome;

    /// Short name used in log output
    fn name(&self) -> &'static str;
}

/// Extractor that runs the configured unrar command line
///
/// The command template is split into words; the archive path and the
/// destination directory are appended as the last two arguments. No shell is
/// involved, so paths with spaces or quotes need no escaping.
///
/// # Examples
///
/// ```no_run
/// use extended_unrar::extraction::{CliExtractor, Extractor};
/// use extended_unrar::types::ArchivePart;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() {
/// let extractor = CliExtractor::new("unrar x -y -p- -o+");
/// let outcome = extractor
///     .extract(&ArchivePart::new("/downloads/movie.rar"), Path::new("/downloads"))
///     .await;
/// println!("{:?}", outcome);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CliExtractor {
    template: String,
}

impl CliExtractor {
    /// Create an extractor from a command template
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Create an extractor from the validated configuration
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.unrar_cmd.clone())
    }

    /// The command template this extractor runs
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Resolve the program and its leading arguments
    ///
    /// The program is looked up with `which`, so a bare name is searched in
    /// PATH and an explicit path must point at an executable file.
    fn command_line(&self) -> Result<(PathBuf, Vec<String>)> {
        let mut words = split_command(&self.template)
            .map_err(|e| match e {
                Error::Config { message, .. } => Error::ExternalTool(message),
                other => other,
            })?
            .into_iter();

        let program = words
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::ExternalTool("unrar command is empty".to_string()))?;

        let resolved = which::which(&program)
            .map_err(|e| Error::ExternalTool(format!("cannot find {}: {}", program, e)))?;

        Ok((resolved, words.collect()))
    }

    /// Run the tool and wait for it to exit
    ///
    /// Returns `Err(Error::ExternalTool)` if the process could not be started.
    /// The child inherits stdout and stderr so its output ends up in the host log.
    pub async fn run(&self, archive: &Path, dest: &Path) -> Result<ExitStatus> {
        let (program, args) = self.command_line()?;

        debug!(?program, ?args, ?archive, ?dest, "launching unrar");

        Command::new(&program)
            .args(&args)
            .arg(archive)
            .arg(destination_arg(dest))
            .status()
            .await
            .map_err(|e| {
                Error::ExternalTool(format!("failed to execute {}: {}", program.display(), e))
            })
    }
}

#[async_trait]
impl Extractor for CliExtractor {
    async fn extract(&self, archive: &ArchivePart, dest: &Path) -> ExtractionOutcome {
        match self.run(archive.path(), dest).await {
            Ok(status) => match status.code() {
                Some(code) => ExtractionOutcome::from_exit_code(code),
                None => ExtractionOutcome::Failure {
                    reason: format!("unrar terminated without an exit code ({})", status),
                },
            },
            Err(e) => ExtractionOutcome::Failure {
                reason: format!("Execution of unrar command failed: {}", e),
            },
        }
    }

    fn name(&self) -> &'static str {
        "cli-unrar"
    }
}

/// Destination directory as unrar expects it
///
/// unrar only treats its last argument as the output directory when it ends
/// with a path separator; otherwise it is taken as a file mask.
fn destination_arg(dest: &Path) -> OsString {
    let mut arg = dest.as_os_str().to_os_string();
    let ends_with_separator = dest
        .as_os_str()
        .as_encoded_bytes()
        .last()
        .is_some_and(|b| *b == b'/' || char::from(*b) == MAIN_SEPARATOR);
    if !ends_with_separator {
        arg.push(MAIN_SEPARATOR.to_string());
    }
    arg
}
