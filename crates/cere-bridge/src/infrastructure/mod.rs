//! Infrastructure layer for cere-bridge.
//!
//! Everything here exists so the bridge can run headless: a tokio task plays
//! the role of the platform UI thread, a recording surface plays the web view,
//! and scenario files play the host application and the page.
//!
//! # Responsibilities
//!
//! - Running posted work strictly in order on one task ([`UiQueue`])
//! - Recording surface requests and completing scripts asynchronously
//! - Loading the TOML harness config
//! - Parsing and replaying JSON-lines scenarios
//!
//! # What does NOT belong here?
//!
//! - Routing and lifecycle rules (that is the application layer)
//! - Script text and load URL construction (that is `cere-core`)

pub mod config_file;
pub mod queued_surface;
pub mod scenario;
pub mod ui_queue;

pub use config_file::{ConfigFileError, HarnessConfig};
pub use queued_surface::{CountingLoadingListener, QueuedSurface, SurfaceRequest};
pub use scenario::{
    load_scenario, parse_scenario, replay, ScenarioError, ScenarioReport, ScenarioStep,
    StepOutcome,
};
pub use ui_queue::{UiQueue, UiQueueClosed};
