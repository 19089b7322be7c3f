//! TOML configuration for the harness binary.
//!
//! The file has an optional `[bridge]` table ([`BridgeSettings`]) and a
//! required `[init]` table ([`InitConfig`]):
//!
//! ```toml
//! [bridge]
//! platform = "android"
//!
//! [init]
//! environment = "dev"
//! app_id = "2095"
//! integration_partner_user_id = "partner-user-1"
//! auth_type = "OAUTH_2"
//! access_token = "..."
//! ```
//!
//! Missing fields fall back to their serde defaults, so a minimal file only
//! needs the identity and credential fields.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use cere_core::InitConfig;

use crate::domain::BridgeSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub bridge: BridgeSettings,
    pub init: InitConfig,
}

impl HarnessConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigFileError::Parse`] if the text is not valid TOML or
    /// does not match the schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigFileError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigFileError::Io`] if the file cannot be read, or
    /// [`ConfigFileError::Parse`] if its content is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
