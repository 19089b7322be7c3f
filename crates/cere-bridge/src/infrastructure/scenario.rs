//! JSON-lines scenarios replayed against a bridge.
//!
//! A scenario is a text file with one JSON object per line.  Each object has
//! a `"step"` field naming either a host call or a signal from the page:
//!
//! ```text
//! {"step":"init"}
//! {"step":"sdk_initialized"}
//! {"step":"send_event","event_type":"APP_LAUNCHED","payload":"{}"}
//! {"step":"event_received","event":"PAGE_LOADED"}
//! {"step":"back_pressed"}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.  Every step is posted
//! onto the [`UiQueue`], so host calls and page signals are serialized on
//! one context exactly as they would be on a device.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use cere_core::{Event, InitConfig, InitStatus};

use crate::application::BridgeCore;
use crate::infrastructure::ui_queue::{UiQueue, UiQueueClosed};

/// Error type for scenario loading and replay.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("I/O error reading scenario at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line is not a valid step.
    #[error("invalid step on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The UI queue stopped during replay.
    #[error(transparent)]
    QueueClosed(#[from] UiQueueClosed),
}

/// One scenario step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Host calls `init` with the configured [`InitConfig`].
    Init,
    /// Page signals `sdkInitialized()`.
    SdkInitialized,
    /// Page signals `sdkInitializedError(error)`.
    SdkInitializedError { error: String },
    /// Page signals `onEventReceived(event, payload)`.
    EventReceived {
        event: String,
        #[serde(default)]
        payload: String,
    },
    /// Host calls `send_event`.
    SendEvent {
        event_type: String,
        #[serde(default)]
        payload: String,
    },
    /// Host calls `send_event_for_start`.
    SendEventForStart {
        event_type: String,
        #[serde(default)]
        payload: String,
    },
    /// Host calls `send_trusted_event`.
    SendTrustedEvent {
        event_type: String,
        #[serde(default)]
        payload: String,
    },
    /// Page signals it became interactively available.
    Engagement,
    /// Host forwards the platform back button.
    BackPressed,
    /// Host asks whether the user holds NFTs.
    HasNfts,
    /// Page reports a script result through the native interface.
    JsActionResult { result: String },
}

/// What happened when a step was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The call was accepted.
    Applied,
    /// The call was rejected synchronously with this error message.
    Rejected(String),
    /// `back_pressed` returned this value.
    BackPressed(bool),
}

/// Summary of a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// One outcome per step, in order.
    pub outcomes: Vec<StepOutcome>,
    pub final_status: InitStatus,
    pub back_stack: Vec<Event>,
    pub pending_event: Option<Event>,
    /// Times a `send_event_for_start` ready callback fired.
    pub ready_callbacks: usize,
    /// Results delivered to `has_nfts` handlers.
    pub js_results: Vec<String>,
}

#[derive(Debug, Default)]
struct ReplayLog {
    outcomes: Vec<StepOutcome>,
    ready_callbacks: usize,
    js_results: Vec<String>,
}

/// Parses scenario text into steps.
///
/// # Errors
///
/// Returns [`ScenarioError::Parse`] with the 1-based line number of the first
/// invalid step.
pub fn parse_scenario(text: &str) -> Result<Vec<ScenarioStep>, ScenarioError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| ScenarioError::Parse {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Reads and parses the scenario file at `path`.
///
/// # Errors
///
/// Returns [`ScenarioError::Io`] or [`ScenarioError::Parse`].
pub fn load_scenario(path: &Path) -> Result<Vec<ScenarioStep>, ScenarioError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenario(&text)
}

/// Replays `steps` against `core` on the UI queue and reports the result.
///
/// `init` is the config used by every [`ScenarioStep::Init`].
///
/// # Errors
///
/// Returns [`ScenarioError::QueueClosed`] if the UI queue stops mid-replay.
pub async fn replay(
    core: Arc<BridgeCore>,
    init: InitConfig,
    steps: Vec<ScenarioStep>,
    queue: &UiQueue,
) -> Result<ScenarioReport, ScenarioError> {
    let log = Arc::new(Mutex::new(ReplayLog::default()));
    let init = Arc::new(init);

    for (index, step) in steps.into_iter().enumerate() {
        debug!(index, ?step, "posting scenario step");
        let core = Arc::clone(&core);
        let init = Arc::clone(&init);
        let log = Arc::clone(&log);
        queue.post(move || {
            let outcome = apply_step(&core, &init, step, &log);
            lock(&log).outcomes.push(outcome);
        })?;
        queue.flush().await?;
    }
    // Let completions posted by the last steps run.
    queue.flush().await?;

    let log = std::mem::take(&mut *lock(&log));
    let report = ScenarioReport {
        outcomes: log.outcomes,
        final_status: core.init_status(),
        back_stack: core.back_stack(),
        pending_event: core.pending_event(),
        ready_callbacks: log.ready_callbacks,
        js_results: log.js_results,
    };
    info!(
        steps = report.outcomes.len(),
        status = ?report.final_status,
        depth = report.back_stack.len(),
        "scenario replayed"
    );
    Ok(report)
}

fn lock(log: &Mutex<ReplayLog>) -> std::sync::MutexGuard<'_, ReplayLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

fn applied<E: std::fmt::Display>(result: Result<(), E>) -> StepOutcome {
    match result {
        Ok(()) => StepOutcome::Applied,
        Err(e) => StepOutcome::Rejected(e.to_string()),
    }
}

fn apply_step(
    core: &BridgeCore,
    init: &InitConfig,
    step: ScenarioStep,
    log: &Arc<Mutex<ReplayLog>>,
) -> StepOutcome {
    match step {
        ScenarioStep::Init => applied(core.init(init)),
        ScenarioStep::SdkInitialized => {
            core.on_sdk_initialized();
            StepOutcome::Applied
        }
        ScenarioStep::SdkInitializedError { error } => {
            core.on_sdk_initialized_error(&error);
            StepOutcome::Applied
        }
        ScenarioStep::EventReceived { event, payload } => {
            core.on_event_received(&event, &payload);
            StepOutcome::Applied
        }
        ScenarioStep::SendEvent { event_type, payload } => {
            applied(core.send_event(Event::new(event_type, payload)))
        }
        ScenarioStep::SendEventForStart { event_type, payload } => {
            let log = Arc::clone(log);
            applied(core.send_event_for_start(Event::new(event_type, payload), move || {
                lock(&log).ready_callbacks += 1;
            }))
        }
        ScenarioStep::SendTrustedEvent { event_type, payload } => {
            applied(core.send_trusted_event(&Event::new(event_type, payload)))
        }
        ScenarioStep::Engagement => {
            core.on_engagement_received();
            StepOutcome::Applied
        }
        ScenarioStep::BackPressed => StepOutcome::BackPressed(core.on_back_pressed()),
        ScenarioStep::HasNfts => {
            let log = Arc::clone(log);
            core.has_nfts(move |result| lock(&log).js_results.push(result.to_string()));
            StepOutcome::Applied
        }
        ScenarioStep::JsActionResult { result } => {
            core.on_js_action_result(&result);
            StepOutcome::Applied
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
