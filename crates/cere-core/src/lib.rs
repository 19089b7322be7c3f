//! # cere-core
//!
//! Shared library for the Cere native bridge containing the event model, the
//! initialization types, and the helpers that turn them into something the
//! embedded web page understands (a load URL and evaluable scripts).
//!
//! This crate has zero dependencies on UI frameworks, web views, or async
//! runtimes.  Everything here is a plain value or a pure function, which is
//! why the bridge crate can test its routing logic without a real page.
//!
//! # Architecture overview
//!
//! The bridge hosts a remote web application inside a native view.  Native
//! code and the page talk through a tiny protocol:
//!
//! - **native → page**: the bridge evaluates JavaScript that calls the remote
//!   `sendEvent(eventType, payload)` operation.
//! - **page → native**: the page calls three named signals on the native
//!   interface (`sdkInitialized`, `sdkInitializedError`, `onEventReceived`).
//!
//! This crate defines:
//!
//! - **`domain`** – [`Event`], [`PredefinedEventType`], [`InitStatus`],
//!   [`AuthType`] and [`InitConfig`] with its credential validation.
//! - **`protocol`** – the initial load URL and the [`ScriptBuilder`] that
//!   embeds event types and payloads safely into scripts.

pub mod domain;
pub mod protocol;

pub use domain::event::{Event, PredefinedEventType};
pub use domain::init::{AuthType, ConfigError, InitConfig, InitStatus};
pub use protocol::load_url::build_load_url;
pub use protocol::script::{ScriptBuilder, ScriptError};
