//! Extension manifest that describes the extension to NZBGet
//!
//! The manifest lives in `manifest.json` next to the binary. NZBGet reads it to
//! render the extension's settings page and passes each option back to the
//! extension as an `NZBPO_<NAME>` variable.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Manifest shipped with this crate
pub const BUNDLED_MANIFEST: &str = include_str!("../manifest.json");

/// Prefix NZBGet puts in front of extension option names
const OPTION_PREFIX: &str = "NZBPO_";

/// Parsed extension manifest
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Entry point NZBGet executes
    pub main: String,
    /// Internal extension name
    pub name: String,
    /// Name shown in the NZBGet UI
    pub display_name: String,
    /// Extension kind, e.g. `POST-PROCESSING`
    pub kind: String,
    /// Extension version
    pub version: String,
    /// Oldest supported NZBGet version
    #[serde(default)]
    pub nzbget_min_version: Option<String>,
    /// One-line summary
    #[serde(default)]
    pub about: String,
    /// Requirements shown to the user
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Long description, one entry per line
    #[serde(default)]
    pub description: Vec<String>,
    /// User-configurable options
    #[serde(default)]
    pub options: Vec<ManifestOption>,
}

/// One option on the extension settings page
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestOption {
    /// Option name without prefix
    pub name: String,
    /// Label shown in the UI
    pub display_name: String,
    /// Default value (string or number)
    pub value: serde_json::Value,
    /// Help text, one entry per line
    #[serde(default)]
    pub description: Vec<String>,
    /// Allowed values, or a numeric range for number options
    #[serde(default)]
    pub select: Vec<serde_json::Value>,
}

impl ManifestOption {
    /// Name of the variable NZBGet uses to pass this option
    pub fn env_key(&self) -> String {
        format!("{}{}", OPTION_PREFIX, self.name.to_uppercase())
    }
}

impl Manifest {
    /// Parse a manifest from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the manifest bundled with this crate
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_MANIFEST)
    }

    /// Look up an option by name (case-insensitive)
    pub fn option(&self, name: &str) -> Option<&ManifestOption> {
        self.options
            .iter()
            .find(|opt| opt.name.eq_ignore_ascii_case(name))
    }
}
