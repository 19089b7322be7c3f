//! Events exchanged between native code and the hosted page.
//!
//! An [`Event`] is the only unit of communication on the bridge.  Most event
//! types are opaque to native code and are simply forwarded to the page, but a
//! closed set of [`PredefinedEventType`]s drives the bridge's own state
//! machine (page confirmation, back navigation, logout).

use std::fmt;

/// An immutable `{eventType, payload}` pair.
///
/// `payload` is the serialized text of a JSON object literal (for example
/// `{"screen":"home"}`) or an empty string.  It is kept as text because the
/// bridge never interprets it; it is validated only when a script is built
/// from it (see [`crate::ScriptBuilder`]).
///
/// # Examples
///
/// ```rust
/// use cere_core::{Event, PredefinedEventType};
///
/// let event = Event::new("APP_LAUNCHED", "{}");
/// assert_eq!(event.event_type(), "APP_LAUNCHED");
/// assert_eq!(event.predefined(), None);
///
/// let back = Event::predefined_event(PredefinedEventType::NavigatePreviousPage);
/// assert_eq!(back.event_type(), "NAVIGATE_PREVIOUS_PAGE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    event_type: String,
    payload: String,
}

impl Event {
    /// Creates an event from its type name and serialized JSON payload.
    pub fn new(event_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            payload: payload.into(),
        }
    }

    /// Creates a synthetic event of a predefined type with an empty payload.
    pub fn predefined_event(kind: PredefinedEventType) -> Self {
        Self::new(kind.as_str(), "")
    }

    /// The event type name, e.g. `"APP_LAUNCHED"`.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The raw payload text.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Returns the predefined type this event maps to, if any.
    pub fn predefined(&self) -> Option<PredefinedEventType> {
        PredefinedEventType::from_event_type(&self.event_type)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.event_type)
    }
}

/// Event types the bridge interprets itself instead of forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedEventType {
    /// The page finished rendering the most recently forwarded event.
    PageLoaded,
    /// Go back one entry in the back-navigation history.
    NavigatePreviousPage,
    /// The user logged out; the bridge resets completely.
    UserLogout,
}

impl PredefinedEventType {
    /// All predefined types, in declaration order.
    pub const ALL: [PredefinedEventType; 3] = [
        PredefinedEventType::PageLoaded,
        PredefinedEventType::NavigatePreviousPage,
        PredefinedEventType::UserLogout,
    ];

    /// Wire name of the event type.
    pub fn as_str(self) -> &'static str {
        match self {
            PredefinedEventType::PageLoaded => "PAGE_LOADED",
            PredefinedEventType::NavigatePreviousPage => "NAVIGATE_PREVIOUS_PAGE",
            PredefinedEventType::UserLogout => "USER_LOGOUT",
        }
    }

    /// Looks up a predefined type by its exact (case-sensitive) wire name.
    ///
    /// Returns `None` for every event type the bridge does not interpret.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == event_type)
    }
}

impl fmt::Display for PredefinedEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_finds_every_predefined_type() {
        for kind in PredefinedEventType::ALL {
            assert_eq!(PredefinedEventType::from_event_type(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(PredefinedEventType::from_event_type("page_loaded"), None);
    }

    #[test]
    fn test_lookup_returns_none_for_custom_event() {
        assert_eq!(PredefinedEventType::from_event_type("APP_LAUNCHED"), None);
        assert_eq!(PredefinedEventType::from_event_type(""), None);
    }

    #[test]
    fn test_event_exposes_type_and_payload() {
        // Arrange / Act
        let event = Event::new("OPEN_WALLET", r#"{"tab":"nfts"}"#);

        // Assert
        assert_eq!(event.event_type(), "OPEN_WALLET");
        assert_eq!(event.payload(), r#"{"tab":"nfts"}"#);
        assert_eq!(event.to_string(), "OPEN_WALLET");
    }

    #[test]
    fn test_predefined_event_has_empty_payload() {
        let event = Event::predefined_event(PredefinedEventType::UserLogout);
        assert_eq!(event.event_type(), "USER_LOGOUT");
        assert!(event.payload().is_empty());
        assert_eq!(event.predefined(), Some(PredefinedEventType::UserLogout));
    }
}
