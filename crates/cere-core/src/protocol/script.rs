//! Structured construction of the scripts evaluated inside the hosted page.
//!
//! Every value that reaches a script goes through `serde_json` first:
//!
//! - the event type is embedded as a JSON string literal, so quotes or
//!   backticks in a type name cannot escape the literal;
//! - the payload is checked to be a JSON object and then embedded as written,
//!   so the page receives an object (not a JSON-encoded string) and malformed
//!   payloads are rejected here instead of failing silently in the page.
//!
//! A JSON object literal is also a valid JavaScript expression, which is what
//! makes the direct embedding safe.

use serde::de::IgnoredAny;
use serde_json::Value;
use thiserror::Error;

use crate::domain::event::Event;

/// Name of the remote bridge object exposed by the hosted page.
pub const DEFAULT_REMOTE_OBJECT: &str = "cereSDK";

/// Name under which the native interface is registered in the page.
pub const DEFAULT_NATIVE_INTERFACE: &str = "Android";

/// Errors raised while building a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// The payload is not valid JSON, or is valid JSON but not an object.
    #[error("invalid payload for event {event_type}: {reason}")]
    InvalidPayload { event_type: String, reason: String },
}

/// Builds scripts that call the remote bridge object.
///
/// # Example
///
/// ```rust
/// use cere_core::{Event, ScriptBuilder};
///
/// let scripts = ScriptBuilder::default();
/// let script = scripts.send_event(&Event::new("APP_LAUNCHED", r#"{"a":1}"#)).unwrap();
/// assert!(script.contains(r#"cereSDK.sendEvent(eventType, {"a":1})"#));
///
/// assert!(scripts.send_event(&Event::new("APP_LAUNCHED", "[1,2]")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBuilder {
    remote_object: String,
    native_interface: String,
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_OBJECT, DEFAULT_NATIVE_INTERFACE)
    }
}

impl ScriptBuilder {
    /// Creates a builder targeting the given remote object and native
    /// interface names.
    pub fn new(remote_object: impl Into<String>, native_interface: impl Into<String>) -> Self {
        Self {
            remote_object: remote_object.into(),
            native_interface: native_interface.into(),
        }
    }

    /// Script that sends `event` to the page and logs the outcome.
    ///
    /// A rejected promise is caught and logged inside the page; it never
    /// reaches native code.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::InvalidPayload`] if the payload is not a JSON
    /// object.
    pub fn send_event(&self, event: &Event) -> Result<String, ScriptError> {
        let event_type = string_literal(event.event_type());
        let payload = payload_literal(event)?;
        let remote = &self.remote_object;

        Ok(format!(
            r#"(async function() {{
    const eventType = {event_type};
    return {remote}.sendEvent(eventType, {payload}).
        then(() => {{
            console.log('event ' + eventType + ' sent');
        }}).
        catch(err => {{
            console.log(eventType + ' sending error ' + err);
        }});
}})();"#
        ))
    }

    /// Script that sends `event` with a signature over the current timestamp.
    ///
    /// The page signs the timestamp with `signMessage`, and the sent payload
    /// is `{timestamp, signature}` merged with the event's own payload (the
    /// event's keys win on conflict).
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::InvalidPayload`] if the payload is not a JSON
    /// object.
    pub fn send_trusted_event(&self, event: &Event) -> Result<String, ScriptError> {
        let event_type = string_literal(event.event_type());
        let payload = payload_literal(event)?;
        let remote = &self.remote_object;

        Ok(format!(
            r#"(async function() {{
    const eventType = {event_type};
    const timestamp = Number(new Date());
    const signature = await {remote}.signMessage(timestamp);
    const payload = Object.assign({{ timestamp, signature }}, {payload});
    return {remote}.sendEvent(eventType, payload).
        then(() => {{
            console.log('event ' + eventType + ' sent');
        }}).
        catch(err => {{
            console.log(eventType + ' sending error ' + err);
        }});
}})();"#
        ))
    }

    /// Script that asks the page whether the user holds NFTs and reports the
    /// answer through the native interface's `onJSActionResult`.
    pub fn has_nfts(&self) -> String {
        let remote = &self.remote_object;
        let native = &self.native_interface;

        format!(
            r#"(async function() {{
    const result = await {remote}.hasNfts();
    {native}.onJSActionResult(String(result));
}})();"#
        )
    }
}

fn string_literal(value: &str) -> String {
    // Serializing a &str cannot fail.
    Value::String(value.to_owned()).to_string()
}

/// Validates the event payload and returns it as an object literal.
///
/// The trimmed text is embedded as written, so key order and number precision
/// survive.  A blank payload stands for an empty object.
fn payload_literal(event: &Event) -> Result<String, ScriptError> {
    let raw = event.payload().trim();
    if raw.is_empty() {
        return Ok("{}".to_string());
    }

    let invalid = |reason: String| ScriptError::InvalidPayload {
        event_type: event.event_type().to_string(),
        reason,
    };

    // IgnoredAny checks syntax without converting numbers.
    match serde_json::from_str::<IgnoredAny>(raw) {
        Ok(_) if raw.starts_with('{') => Ok(raw.to_string()),
        Ok(_) => Err(invalid(format!(
            "expected a JSON object, got {}",
            json_kind(raw)
        ))),
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Kind of a syntactically valid, trimmed JSON text.
fn json_kind(raw: &str) -> &'static str {
    match raw.as_bytes().first() {
        Some(b'[') => "an array",
        Some(b'"') => "a string",
        Some(b't' | b'f') => "a boolean",
        Some(b'n') => "null",
        Some(b'{') => "an object",
        _ => "a number",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
