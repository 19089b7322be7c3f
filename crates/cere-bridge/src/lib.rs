//! cere-bridge library crate.
//!
//! This crate hosts a remote web application inside a native view and bridges
//! a small, bidirectional event protocol between native code and that page.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Host application (init, sendEvent, onBackPressed, callbacks)
//!         ↕
//! [cere-bridge]
//!   ├── domain/           BridgeSettings, host callback types
//!   ├── application/      BridgeCore: init lifecycle, event routing, logout
//!   │                     NavigationHistory: back stack + pending slot
//!   └── infrastructure/
//!         ├── ui_queue/        serial task queue (the "UI thread")
//!         ├── queued_surface/  recording WebSurface for the harness
//!         ├── config_file/     TOML harness config
//!         └── scenario/        JSON-lines scenario replay
//!         ↕
//! Embedded web surface (load URL, evaluate script, three inbound signals)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and depends only on `cere-core`.
//! - `application` talks to the outside world exclusively through the
//!   [`application::WebSurface`] and [`application::PageLoadingListener`]
//!   traits, so it can be driven by test doubles.
//! - `infrastructure` provides the tokio-backed implementations.

/// Domain layer: settings and host callback types (no I/O).
pub mod domain;

/// Application layer: the bridge core and its collaborator traits.
pub mod application;

/// Infrastructure layer: UI queue, recording surface, config and scenarios.
pub mod infrastructure;

pub use application::{BridgeCore, BridgeError, PageLoadingListener, WebSurface};
pub use cere_core::{AuthType, Event, InitConfig, InitStatus, PredefinedEventType};
pub use domain::{BridgeSettings, Disposition};
