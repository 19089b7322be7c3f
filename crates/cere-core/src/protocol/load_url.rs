//! Construction of the URL that boots the hosted page.
//!
//! Query parameters, in order:
//!
//! ```text
//! appId, integrationPartnerUserId, platform, version, env, type,
//! accessToken            (token-based auth types)
//! email, password        (EMAIL auth type)
//! ```
//!
//! Values are form-urlencoded, so user identifiers containing `&` or spaces
//! cannot break the query string.

use url::Url;

use crate::domain::init::{ConfigError, InitConfig};

/// Builds the load URL for `config`.
///
/// `platform` and `sdk_version` describe the embedding SDK itself and come
/// from the bridge settings rather than from the host's config.
///
/// # Errors
///
/// - [`ConfigError::MissingCredential`] if the auth type's credentials are
///   missing or blank.
/// - [`ConfigError::InvalidBaseUrl`] if `config.base_url` is not a URL.
///
/// # Example
///
/// ```rust
/// use cere_core::{build_load_url, AuthType, InitConfig};
///
/// let config = InitConfig::new("app-1", "user-1", AuthType::Oauth2).with_access_token("t0k");
/// let url = build_load_url(&config, "android", "1.2.0").unwrap();
/// assert_eq!(
///     url.query(),
///     Some("appId=app-1&integrationPartnerUserId=user-1&platform=android&version=1.2.0&env=dev&type=OAUTH_2&accessToken=t0k")
/// );
/// ```
pub fn build_load_url(
    config: &InitConfig,
    platform: &str,
    sdk_version: &str,
) -> Result<Url, ConfigError> {
    let credentials = config.credential_params()?;

    let mut url = Url::parse(&config.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
        url: config.base_url.clone(),
        source,
    })?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("appId", &config.app_id)
            .append_pair("integrationPartnerUserId", &config.integration_partner_user_id)
            .append_pair("platform", platform)
            .append_pair("version", sdk_version)
            .append_pair("env", &config.environment)
            .append_pair("type", config.auth_type.as_str());
        for (name, value) in credentials {
            query.append_pair(name, value);
        }
    }

    Ok(url)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::init::AuthType;

    fn query_pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_token_url_contains_access_token_and_no_password_fields() {
        // Arrange
        let cfg = InitConfig::new("app", "user", AuthType::Firebase).with_access_token("abc");

        // Act
        let url = build_load_url(&cfg, "android", "0.1.0").unwrap();
        let query = url.query().unwrap_or_default();

        // Assert
        assert!(query.contains("accessToken=abc"));
        assert!(!query.contains("email="));
        assert!(!query.contains("password="));
    }

    #[test]
    fn test_email_url_contains_email_and_password() {
        let cfg = InitConfig::new("app", "user", AuthType::Email)
            .with_email_password("me@example.com", "pw");
        let url = build_load_url(&cfg, "android", "0.1.0").unwrap();
        let pairs = query_pairs(&url);
        assert!(pairs.contains(&("email".into(), "me@example.com".into())));
        assert!(pairs.contains(&("password".into(), "pw".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "accessToken"));
    }

    #[test]
    fn test_parameters_are_appended_in_wire_order() {
        let cfg = InitConfig::new("app", "user", AuthType::Oauth2)
            .with_environment("stage")
            .with_access_token("tok");
        let url = build_load_url(&cfg, "ios", "2.0.0").unwrap();
        let names: Vec<String> = query_pairs(&url).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            vec![
                "appId",
                "integrationPartnerUserId",
                "platform",
                "version",
                "env",
                "type",
                "accessToken"
            ]
        );
    }

    #[test]
    fn test_values_are_form_encoded() {
        let cfg = InitConfig::new("app&x=1", "user name", AuthType::Oauth2).with_access_token("t");
        let url = build_load_url(&cfg, "android", "0.1.0").unwrap();
        let pairs = query_pairs(&url);
        assert_eq!(pairs[0], ("appId".into(), "app&x=1".into()));
        assert_eq!(pairs[1], ("integrationPartnerUserId".into(), "user name".into()));
    }

    #[test]
    fn test_base_url_path_is_preserved() {
        let cfg = InitConfig::new("a", "u", AuthType::Oauth2)
            .with_base_url("https://example.test/native.html")
            .with_access_token("t");
        let url = build_load_url(&cfg, "android", "0.1.0").unwrap();
        assert_eq!(url.host_str(), Some("example.test"));
        assert_eq!(url.path(), "/native.html");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let cfg = InitConfig::new("a", "u", AuthType::Oauth2)
            .with_base_url("not a url")
            .with_access_token("t");
        let err = build_load_url(&cfg, "android", "0.1.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_missing_credentials_win_over_bad_base_url() {
        // Credentials are validated first so the error names the field.
        let cfg = InitConfig::new("a", "u", AuthType::Oauth2).with_base_url("not a url");
        let err = build_load_url(&cfg, "android", "0.1.0").unwrap_err();
        assert_eq!(err.field(), "accessToken");
    }
}
