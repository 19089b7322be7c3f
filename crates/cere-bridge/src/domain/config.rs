//! Bridge settings.
//!
//! [`BridgeSettings`] describes the embedding SDK itself: which platform tag
//! and version it reports to the page, and the names under which the two
//! sides expose themselves to each other.  Per-user data (app id, user id,
//! credentials) lives in [`cere_core::InitConfig`] instead.
//!
//! The struct is plain data with no global state and no environment reads.
//! The infrastructure layer populates it from a TOML file; tests and hosts
//! can use [`BridgeSettings::default`].

use serde::{Deserialize, Serialize};

use cere_core::protocol::script::{DEFAULT_NATIVE_INTERFACE, DEFAULT_REMOTE_OBJECT};
use cere_core::ScriptBuilder;

/// Static settings of the embedding SDK.
///
/// # Example
///
/// ```rust
/// use cere_bridge::domain::BridgeSettings;
///
/// let settings = BridgeSettings::default();
/// assert_eq!(settings.platform, "android");
/// assert_eq!(settings.remote_object, "cereSDK");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Platform tag sent as the `platform` query parameter.
    #[serde(default = "default_platform")]
    pub platform: String,

    /// SDK version sent as the `version` query parameter.
    #[serde(default = "default_sdk_version")]
    pub sdk_version: String,

    /// Global object in the page that implements `sendEvent`, `signMessage`
    /// and `hasNfts`.
    #[serde(default = "default_remote_object")]
    pub remote_object: String,

    /// Name under which the native side is registered in the page; scripts
    /// that report results back call methods on it.
    #[serde(default = "default_native_interface")]
    pub native_interface: String,
}

fn default_platform() -> String {
    "android".to_string()
}

fn default_sdk_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_remote_object() -> String {
    DEFAULT_REMOTE_OBJECT.to_string()
}

fn default_native_interface() -> String {
    DEFAULT_NATIVE_INTERFACE.to_string()
}

impl Default for BridgeSettings {
    /// | Field            | Default                |
    /// |------------------|------------------------|
    /// | platform         | `android`              |
    /// | sdk_version      | this crate's version   |
    /// | remote_object    | `cereSDK`              |
    /// | native_interface | `Android`              |
    fn default() -> Self {
        Self {
            platform: default_platform(),
            sdk_version: default_sdk_version(),
            remote_object: default_remote_object(),
            native_interface: default_native_interface(),
        }
    }
}

impl BridgeSettings {
    /// Script builder targeting the configured object names.
    pub fn script_builder(&self) -> ScriptBuilder {
        ScriptBuilder::new(&self.remote_object, &self.native_interface)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
