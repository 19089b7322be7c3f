//! Integration tests for the cere-core public API.
//!
//! These tests go through the crate root re-exports only, the way the bridge
//! crate consumes them: config deserialised from TOML, validated, turned into
//! a load URL, and events turned into scripts.

use cere_core::{
    build_load_url, AuthType, ConfigError, Event, InitConfig, PredefinedEventType, ScriptBuilder,
};

#[test]
fn test_config_from_toml_uses_defaults_for_missing_fields() {
    let config: InitConfig = toml::from_str(
        r#"
        app_id = "2095"
        integration_partner_user_id = "user-1"
        auth_type = "OAUTH_2"
        access_token = "tok"
        "#,
    )
    .expect("config must parse");

    assert_eq!(config.environment, "dev");
    assert_eq!(config.auth_type, AuthType::Oauth2);
    assert!(config.validate().is_ok());
}

#[test]
fn test_email_config_from_toml_builds_email_url() {
    let config: InitConfig = toml::from_str(
        r#"
        environment = "stage"
        base_url = "https://pages.example.test/native.html"
        app_id = "2095"
        integration_partner_user_id = "user-1"
        auth_type = "EMAIL"
        email = "someone@example.test"
        password = "pw"
        "#,
    )
    .expect("config must parse");

    let url = build_load_url(&config, "android", "9.9.9").expect("url must build");
    let query = url.query().expect("query must be present");

    assert!(query.starts_with("appId=2095&integrationPartnerUserId=user-1"));
    assert!(query.contains("env=stage"));
    assert!(query.contains("type=EMAIL"));
    assert!(query.contains("email=someone%40example.test"));
    assert!(!query.contains("accessToken"));
}

#[test]
fn test_unknown_auth_type_fails_to_parse() {
    let result: Result<InitConfig, _> = toml::from_str(
        r#"
        app_id = "1"
        integration_partner_user_id = "u"
        auth_type = "SMOKE_SIGNALS"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_blank_access_token_error_names_field_and_auth_type() {
    let config = InitConfig::new("1", "u", AuthType::Trusted3rdParty).with_access_token("");

    let err = build_load_url(&config, "android", "0.1.0").unwrap_err();

    assert_eq!(
        err,
        ConfigError::MissingCredential {
            field: "accessToken",
            auth_type: AuthType::Trusted3rdParty,
        }
    );
    assert!(err.to_string().contains("accessToken"));
    assert!(err.to_string().contains("TRUSTED_3RD_PARTY"));
}

#[test]
fn test_every_custom_event_produces_a_script_and_predefined_types_are_recognised() {
    let scripts = ScriptBuilder::default();

    for kind in PredefinedEventType::ALL {
        let event = Event::predefined_event(kind);
        assert_eq!(event.predefined(), Some(kind));
    }

    let custom = Event::new("APP_LAUNCHED_TEST", r#"{"source":"integration"}"#);
    assert_eq!(custom.predefined(), None);
    let script = scripts.send_event(&custom).expect("script must build");
    assert!(script.starts_with("(async function() {"));
    assert!(script.ends_with("})();"));
    assert!(script.contains(r#"{"source":"integration"}"#));
}
