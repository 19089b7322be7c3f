//! Domain layer for cere-bridge.
//!
//! Pure types with no dependencies on I/O, web views or async runtimes:
//!
//! - [`BridgeSettings`]: what the embedding SDK says about itself
//! - host callback types registered on the bridge

pub mod config;
pub mod handlers;

pub use config::BridgeSettings;
pub use handlers::{
    Disposition, EventReceivedHandler, InitErrorHandler, InitFinishedHandler, JsResultHandler,
    SurfaceReadyHandler,
};
