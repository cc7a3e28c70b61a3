//! Checks that run before any archive is touched
//!
//! The gate reads the NZBGet environment, refuses to run on an unsupported or
//! misconfigured host, skips downloads that did not complete successfully and
//! gives NZBGet time to finish its own cleanup. On success it hands back the
//! [`ExtractionConfig`] the engine runs with.

use crate::config::{ExtractionConfig, HostOptions, keys, parse_wait_time};
use crate::error::{Error, Result};
use crate::types::PostProcessExit;
use tracing::{debug, info, warn};

/// Outcome of the preflight checks
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Preflight {
    /// All checks passed; run the engine with this configuration
    Proceed(ExtractionConfig),
    /// Stop without running the engine and report this to the host
    Exit(PostProcessExit),
}

/// Validate the host environment and build the engine configuration
///
/// Returns `Err` for host misconfiguration (reported to NZBGet as an error),
/// `Ok(Preflight::Exit(..))` when there is nothing to do for this download, and
/// `Ok(Preflight::Proceed(..))` otherwise.
///
/// When NZBGet's `UnpackCleanupDisk` option is enabled this sleeps for the
/// configured wait time before returning.
pub async fn run_preflight(options: &HostOptions) -> Result<Preflight> {
    if !options.contains(keys::EXTENSIONS) {
        return Err(Error::config(
            keys::EXTENSIONS,
            "This script requires NZBGet v18.0 or later",
        ));
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Script successfully started"
    );

    for key in keys::REQUIRED {
        options.require(key)?;
    }

    if !options.is_yes(keys::UNPACK) {
        return Err(Error::config(
            keys::UNPACK,
            "You must enable option \"Unpack\" in NZBGet configuration, exiting",
        ));
    }

    let unrar_cmd = resolve_unrar_cmd(options)?;
    let delete_leftover = options.is_yes(keys::DELETE_LEFTOVER);

    if options.get(keys::TOTAL_STATUS) != Some("SUCCESS") {
        warn!("NZBGet download TOTALSTATUS is not SUCCESS, exiting");
        return Ok(Preflight::Exit(PostProcessExit::None));
    }

    let working_dir = options.path(keys::DIRECTORY).unwrap_or_default();
    let is_dir = tokio::fs::metadata(&working_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        warn!(
            "Destination directory {} does not exist, exiting",
            working_dir.display()
        );
        return Ok(Preflight::Exit(PostProcessExit::None));
    }

    if options.is_yes(keys::UNPACK_CLEANUP_DISK) {
        let raw = options.require(keys::WAIT_TIME)?;
        let wait = parse_wait_time(raw)?;
        debug!(
            "Sleeping {} seconds to give NZBGet time to finish UnpackCleanupDisk action",
            wait.as_secs()
        );
        tokio::time::sleep(wait).await;
    }

    Ok(Preflight::Proceed(
        ExtractionConfig::new(unrar_cmd, working_dir).with_delete_leftover(delete_leftover),
    ))
}

/// Pick the unrar command: the extension option, or NZBGet's global one if empty
///
/// Only an empty option falls back. Whatever comes out is not validated here;
/// an unusable command fails when the first archive is extracted, so downloads
/// without archives are unaffected.
fn resolve_unrar_cmd(options: &HostOptions) -> Result<String> {
    let own = options.require(keys::UNRAR_CMD)?;
    if !own.is_empty() {
        return Ok(own.to_string());
    }

    debug!("UnrarCmd setting is blank. Using default NZBGet UnrarCmd setting");
    Ok(options.require(keys::HOST_UNRAR_CMD)?.to_string())
}
