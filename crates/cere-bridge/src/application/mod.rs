//! Application layer for cere-bridge.
//!
//! The application layer knows *what* the bridge does (init lifecycle,
//! event routing, back-navigation, logout) but delegates *how* pages are
//! loaded and scripts evaluated to a [`WebSurface`] implementation.
//!
//! # What does NOT belong here?
//!
//! - Task queues or async runtimes (infrastructure)
//! - Reading config files (infrastructure)
//! - Script text construction (`cere-core`)

pub mod bridge_core;
pub mod instance;
pub mod navigation;

pub use bridge_core::{BridgeCore, BridgeError, PageLoadingListener, ScriptCompletion, WebSurface};
pub use navigation::NavigationHistory;
