//! Configuration types for extended-unrar
//!
//! NZBGet hands every setting to a post-processing extension through environment
//! variables. Global options carry the `NZBOP_` prefix, extension options the
//! `NZBPO_` prefix and per-download values the `NZBPP_` prefix.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::time::Duration;

/// Names of the host variables read by the extension
pub mod keys {
    /// Present on NZBGet v18.0 and later
    pub const EXTENSIONS: &str = "NZBOP_EXTENSIONS";
    /// Global unrar command configured in NZBGet
    pub const HOST_UNRAR_CMD: &str = "NZBOP_UNRARCMD";
    /// Whether NZBGet's own unpack step is enabled
    pub const UNPACK: &str = "NZBOP_UNPACK";
    /// Whether NZBGet deletes archives after its own unpack
    pub const UNPACK_CLEANUP_DISK: &str = "NZBOP_UNPACKCLEANUPDISK";
    /// Extension option: unrar command override
    pub const UNRAR_CMD: &str = "NZBPO_UNRARCMD";
    /// Extension option: seconds to wait before scanning
    pub const WAIT_TIME: &str = "NZBPO_WAITTIME";
    /// Extension option: delete archive parts after extraction
    pub const DELETE_LEFTOVER: &str = "NZBPO_DELETELEFTOVER";
    /// Overall status of the download
    pub const TOTAL_STATUS: &str = "NZBPP_TOTALSTATUS";
    /// Destination directory of the download
    pub const DIRECTORY: &str = "NZBPP_DIRECTORY";

    /// Options that must be present for the extension to run
    pub const REQUIRED: [&str; 4] = [HOST_UNRAR_CMD, UNRAR_CMD, WAIT_TIME, DELETE_LEFTOVER];
}

/// Length of the `NZBOP_` / `NZBPO_` / `NZBPP_` prefixes
const PREFIX_LEN: usize = 6;

/// Strip the host prefix from an option key for user-facing messages
///
/// `NZBPO_WAITTIME` is shown as `WAITTIME`, which is how the option appears in
/// the NZBGet settings page.
pub fn option_display_name(key: &str) -> &str {
    key.get(PREFIX_LEN..).unwrap_or(key)
}

/// Snapshot of the variables NZBGet passed to the process
///
/// Built from any iterator of key/value pairs so tests never touch the real
/// process environment. Values are kept as raw OS strings: NZBGet passes
/// download paths through unchanged, and those need not be valid UTF-8.
#[derive(Clone, Debug, Default)]
pub struct HostOptions {
    vars: HashMap<String, OsString>,
}

impl HostOptions {
    /// Build options from key/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Build options from the current process environment
    ///
    /// Variables whose name is not valid UTF-8 cannot be any of ours and are
    /// dropped.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value))),
        )
    }

    /// Value of a variable as text
    ///
    /// A value that is not valid UTF-8 reads as unset here; use
    /// [`HostOptions::get_os`] or [`HostOptions::path`] for paths.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_os(key).and_then(OsStr::to_str)
    }

    /// Raw value of a variable
    pub fn get_os(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(key).map(OsString::as_os_str)
    }

    /// Value of a variable as a path, without any lossy conversion
    pub fn path(&self, key: &str) -> Option<PathBuf> {
        self.get_os(key).map(PathBuf::from)
    }

    /// Returns true if the variable is set (even to an empty string)
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Value of a variable that must be present
    pub fn require(&self, key: &str) -> Result<&str> {
        let raw = self.get_os(key).ok_or_else(|| {
            Error::config(
                key,
                format!(
                    "Option {} is missing in NZBGet configuration. Please check script settings",
                    option_display_name(key)
                ),
            )
        })?;

        raw.to_str().ok_or_else(|| {
            Error::config(
                key,
                format!(
                    "Option {} is not valid UTF-8: {}",
                    option_display_name(key),
                    raw.to_string_lossy()
                ),
            )
        })
    }

    /// Returns true if the variable is set to exactly `yes`
    pub fn is_yes(&self, key: &str) -> bool {
        self.get(key) == Some("yes")
    }
}

/// Parse the wait time option
///
/// The value is a number of seconds, possibly fractional; the fraction is dropped.
pub fn parse_wait_time(raw: &str) -> Result<Duration> {
    let secs: f64 = raw.trim().parse().map_err(|_| {
        Error::config(
            keys::WAIT_TIME,
            format!("invalid wait time {:?}: expected a number of seconds", raw),
        )
    })?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(Error::config(
            keys::WAIT_TIME,
            format!("invalid wait time {:?}: must be zero or positive", raw),
        ));
    }

    Ok(Duration::from_secs(secs.trunc() as u64))
}

/// Validated settings the extraction engine runs with
///
/// Produced by the preflight gate and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Extraction command template, e.g. `unrar x -y -p-`
    ///
    /// The archive path and the destination directory are appended as the last
    /// two arguments.
    pub unrar_cmd: String,

    /// Directory tree to scan; also the extraction destination
    pub working_dir: PathBuf,

    /// Delete archive parts once they have been extracted
    #[serde(default)]
    pub delete_leftover: bool,
}

impl ExtractionConfig {
    /// Create a configuration bundle
    pub fn new(unrar_cmd: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            unrar_cmd: unrar_cmd.into(),
            working_dir: working_dir.into(),
            delete_leftover: false,
        }
    }

    /// Enable or disable leftover deletion
    pub fn with_delete_leftover(mut self, delete_leftover: bool) -> Self {
        self.delete_leftover = delete_leftover;
        self
    }

    /// Split the command template into program and arguments
    pub fn command_line(&self) -> Result<Vec<String>> {
        let args = split_command(&self.unrar_cmd)?;
        if args.is_empty() {
            return Err(Error::config(
                keys::UNRAR_CMD,
                "unrar command is empty".to_string(),
            ));
        }
        Ok(args)
    }
}

/// Split a command template into words
///
/// Uses POSIX shell quoting rules without running a shell: quotes group words
/// and are removed, a backslash escapes the next character outside quotes.
/// Paths with backslashes, such as Windows install paths, must be quoted.
pub fn split_command(template: &str) -> Result<Vec<String>> {
    shell_words::split(template).map_err(|e| {
        Error::config(
            keys::UNRAR_CMD,
            format!("invalid unrar command {:?}: {}", template, e),
        )
    })
}
