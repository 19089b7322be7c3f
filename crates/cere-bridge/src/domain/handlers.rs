//! Callbacks the host application can register on the bridge.
//!
//! Each callback kind has at most one registered handler; registering a new
//! one replaces the previous handler.  Handlers are reference-counted so the
//! bridge can clone one out of its state and call it without holding a lock,
//! which lets a handler call back into the bridge.

use std::sync::Arc;

use cere_core::Event;

/// Called once when the page reports successful initialization.
pub type InitFinishedHandler = Arc<dyn Fn() + Send + Sync + 'static>;

/// Called once when the page reports an initialization failure, with the
/// page's reason string.
pub type InitErrorHandler = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Offered every inbound event before default routing.
pub type EventReceivedHandler = Arc<dyn Fn(&Event) -> Disposition + Send + Sync + 'static>;

/// Receives the result string of a script that reports back through the
/// native interface (e.g. the NFT query).
pub type JsResultHandler = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// One-shot callback for the next "page is interactively available" signal.
pub type SurfaceReadyHandler = Box<dyn FnOnce() + Send + 'static>;

/// What an inbound-event handler did with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The host consumed the event; default routing is skipped.
    Handled,
    /// Default routing proceeds.
    NotHandled,
}
