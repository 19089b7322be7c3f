//! Initialization configuration and lifecycle status.
//!
//! The host application starts the bridge with an [`InitConfig`].  The bridge
//! validates the credentials the selected [`AuthType`] needs, turns the config
//! into a load URL and then tracks the outcome as an [`InitStatus`].
//!
//! # Status transitions
//!
//! ```text
//! Uninitialised ──init──▶ Initialising ──sdkInitialized──────▶ Initialised
//!                              │
//!                              └──────sdkInitializedError──▶ InitialiseError(reason)
//! ```
//!
//! Calling `init` again from any state restarts at `Initialising`; logging out
//! returns to `Uninitialised`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL of the hosted page used when the config does not override it.
pub const DEFAULT_BASE_URL: &str = "https://sdk.dev.cere.io/common/native.html";

/// Environment name used when the config does not override it.
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Errors raised while validating an [`InitConfig`].
///
/// Both variants are "invalid argument" failures: they are reported
/// synchronously by `init` and leave the bridge state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A credential required by the selected auth type is missing or blank.
    #[error("`{field}` must not be blank for {auth_type} authentication")]
    MissingCredential {
        /// Wire name of the missing field (`accessToken`, `email`, `password`).
        field: &'static str,
        /// The auth type that requires the field.
        auth_type: AuthType,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ConfigError {
    /// Name of the offending field, as it appears on the wire.
    pub fn field(&self) -> &str {
        match self {
            ConfigError::MissingCredential { field, .. } => field,
            ConfigError::InvalidBaseUrl { .. } => "baseUrl",
        }
    }
}

/// Initialization state of the bridge.
///
/// Exactly one status is current at any time.  `InitialiseError` is terminal
/// for the attempt that produced it; a fresh `init` starts over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InitStatus {
    /// `init` has not been called since construction or the last logout.
    #[default]
    Uninitialised,
    /// The page is loading; waiting for `sdkInitialized` or `sdkInitializedError`.
    Initialising,
    /// The page reported success; events can be forwarded.
    Initialised,
    /// The page reported failure with this reason.
    InitialiseError(String),
}

impl InitStatus {
    /// `true` only in the `Initialised` state.
    pub fn is_initialised(&self) -> bool {
        matches!(self, InitStatus::Initialised)
    }
}

/// Authentication method the hosted page should use for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthType {
    /// Email and password.
    #[serde(rename = "EMAIL")]
    Email,
    /// OAuth 2 access token.
    #[serde(rename = "OAUTH_2")]
    Oauth2,
    /// Firebase ID token.
    #[serde(rename = "FIREBASE")]
    Firebase,
    /// Token issued by a trusted integration partner.
    #[serde(rename = "TRUSTED_3RD_PARTY")]
    Trusted3rdParty,
}

impl AuthType {
    /// Wire name sent as the `type` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            AuthType::Email => "EMAIL",
            AuthType::Oauth2 => "OAUTH_2",
            AuthType::Firebase => "FIREBASE",
            AuthType::Trusted3rdParty => "TRUSTED_3RD_PARTY",
        }
    }

    /// `true` if this method authenticates with email and password rather
    /// than an access token.
    pub fn uses_password(self) -> bool {
        matches!(self, AuthType::Email)
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the host supplies to start the bridge.
///
/// `access_token` is required for every [`AuthType`] except
/// [`AuthType::Email`], which requires `email` and `password` instead.
///
/// # Example
///
/// ```rust
/// use cere_core::{AuthType, InitConfig};
///
/// let config = InitConfig::new("app-42", "user-7", AuthType::Oauth2)
///     .with_access_token("token-abc");
/// assert!(config.validate().is_ok());
///
/// let missing = InitConfig::new("app-42", "user-7", AuthType::Email);
/// assert_eq!(missing.validate().unwrap_err().field(), "email");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitConfig {
    /// Environment name passed to the page as `env`.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// URL of the hosted page; query parameters are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identifier of the application.
    pub app_id: String,
    /// The user's identifier in the integration partner's system.
    pub integration_partner_user_id: String,
    /// How the page should authenticate the user.
    pub auth_type: AuthType,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl InitConfig {
    /// Creates a config for the default environment and base URL with no
    /// credentials set.
    pub fn new(
        app_id: impl Into<String>,
        integration_partner_user_id: impl Into<String>,
        auth_type: AuthType,
    ) -> Self {
        Self {
            environment: default_environment(),
            base_url: default_base_url(),
            app_id: app_id.into(),
            integration_partner_user_id: integration_partner_user_id.into(),
            auth_type,
            access_token: None,
            email: None,
            password: None,
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_email_password(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    /// Checks that every credential required by `auth_type` is present and
    /// not blank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] naming the first missing
    /// field.  Fields are checked in wire order (`email` before `password`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.credential_params().map(|_| ())
    }

    /// Returns the credential query parameters for `auth_type`, in wire order.
    ///
    /// # Errors
    ///
    /// Same as [`InitConfig::validate`].
    pub fn credential_params(&self) -> Result<Vec<(&'static str, &str)>, ConfigError> {
        if self.auth_type.uses_password() {
            Ok(vec![
                ("email", self.require("email", self.email.as_deref())?),
                ("password", self.require("password", self.password.as_deref())?),
            ])
        } else {
            Ok(vec![(
                "accessToken",
                self.require("accessToken", self.access_token.as_deref())?,
            )])
        }
    }

    fn require<'a>(
        &self,
        field: &'static str,
        value: Option<&'a str>,
    ) -> Result<&'a str, ConfigError> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingCredential {
                field,
                auth_type: self.auth_type,
            }),
        }
    }
}

// Credentials never reach log output.
impl fmt::Debug for InitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> Option<&'static str> {
            value.as_ref().map(|_| "<redacted>")
        }

        f.debug_struct("InitConfig")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("integration_partner_user_id", &self.integration_partner_user_id)
            .field("auth_type", &self.auth_type)
            .field("access_token", &redact(&self.access_token))
            .field("email", &self.email)
            .field("password", &redact(&self.password))
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_uninitialised() {
        assert_eq!(InitStatus::default(), InitStatus::Uninitialised);
        assert!(!InitStatus::default().is_initialised());
    }

    #[test]
    fn test_only_initialised_status_reports_initialised() {
        assert!(InitStatus::Initialised.is_initialised());
        assert!(!InitStatus::Initialising.is_initialised());
        assert!(!InitStatus::InitialiseError("boom".into()).is_initialised());
    }

    #[test]
    fn test_new_config_uses_default_environment_and_base_url() {
        let cfg = InitConfig::new("app", "user", AuthType::Firebase);
        assert_eq!(cfg.environment, "dev");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_token_auth_without_token_is_rejected() {
        // Arrange
        let cfg = InitConfig::new("app", "user", AuthType::Oauth2);

        // Act
        let err = cfg.validate().unwrap_err();

        // Assert
        assert_eq!(
            err,
            ConfigError::MissingCredential {
                field: "accessToken",
                auth_type: AuthType::Oauth2,
            }
        );
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let cfg = InitConfig::new("app", "user", AuthType::Trusted3rdParty).with_access_token("  ");
        assert_eq!(cfg.validate().unwrap_err().field(), "accessToken");
    }

    #[test]
    fn test_email_auth_requires_email_before_password() {
        let cfg = InitConfig::new("app", "user", AuthType::Email);
        assert_eq!(cfg.validate().unwrap_err().field(), "email");
    }

    #[test]
    fn test_email_auth_requires_password() {
        let cfg = InitConfig::new("app", "user", AuthType::Email).with_email_password("a@b.c", "");
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.field(), "password");
        assert!(err.to_string().contains("EMAIL"));
    }

    #[test]
    fn test_email_auth_ignores_access_token() {
        let cfg = InitConfig::new("app", "user", AuthType::Email)
            .with_email_password("a@b.c", "secret")
            .with_access_token("unused");
        let params = cfg.credential_params().unwrap();
        assert_eq!(params, vec![("email", "a@b.c"), ("password", "secret")]);
    }

    #[test]
    fn test_token_auth_yields_only_access_token() {
        let cfg = InitConfig::new("app", "user", AuthType::Firebase).with_access_token("tok");
        assert_eq!(cfg.credential_params().unwrap(), vec![("accessToken", "tok")]);
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let cfg = InitConfig::new("app", "user", AuthType::Email)
            .with_email_password("a@b.c", "hunter2")
            .with_access_token("tok-secret");
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("tok-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_auth_type_wire_names() {
        assert_eq!(AuthType::Email.to_string(), "EMAIL");
        assert_eq!(AuthType::Oauth2.to_string(), "OAUTH_2");
        assert_eq!(AuthType::Firebase.to_string(), "FIREBASE");
        assert_eq!(AuthType::Trusted3rdParty.to_string(), "TRUSTED_3RD_PARTY");
    }
}
