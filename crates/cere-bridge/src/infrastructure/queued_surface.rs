//! Headless web surface that records requests and completes on the UI queue.
//!
//! [`QueuedSurface`] is what the harness binary drives instead of a real web
//! view.  It keeps every request in order for later inspection and, like a
//! platform web view, resolves script completions asynchronously on the
//! serial [`UiQueue`] rather than inline.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};
use url::Url;

use crate::application::{PageLoadingListener, ScriptCompletion, WebSurface};
use crate::infrastructure::ui_queue::UiQueue;

/// Result string reported for every evaluated script unless overridden.
///
/// Web views report an async function's pending promise as an empty object.
pub const DEFAULT_SCRIPT_RESULT: &str = "{}";

/// One request made to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceRequest {
    LoadUrl(String),
    EvaluateScript(String),
    ClearSession,
}

/// A [`WebSurface`] with no page behind it.
pub struct QueuedSurface {
    queue: UiQueue,
    script_result: String,
    requests: Mutex<Vec<SurfaceRequest>>,
}

impl QueuedSurface {
    pub fn new(queue: UiQueue) -> Self {
        Self {
            queue,
            script_result: DEFAULT_SCRIPT_RESULT.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Overrides the result string passed to script completions.
    pub fn with_script_result(mut self, result: impl Into<String>) -> Self {
        self.script_result = result.into();
        self
    }

    fn record(&self, request: SurfaceRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    /// Every request so far, oldest first.
    pub fn requests(&self) -> Vec<SurfaceRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the evaluated scripts, oldest first.
    pub fn scripts(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                SurfaceRequest::EvaluateScript(script) => Some(script),
                _ => None,
            })
            .collect()
    }

    /// Only the loaded URLs, oldest first.
    pub fn loaded_urls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                SurfaceRequest::LoadUrl(url) => Some(url),
                _ => None,
            })
            .collect()
    }
}

impl WebSurface for QueuedSurface {
    fn load_url(&self, url: &str) {
        info!(url = %loggable_url(url), "surface: load url");
        self.record(SurfaceRequest::LoadUrl(url.to_string()));
    }

    fn evaluate_script(&self, script: &str, on_complete: Option<ScriptCompletion>) {
        debug!(bytes = script.len(), "surface: evaluate script");
        self.record(SurfaceRequest::EvaluateScript(script.to_string()));

        if let Some(done) = on_complete {
            let result = self.script_result.clone();
            if self.queue.post(move || done(result)).is_err() {
                warn!("surface: ui queue closed; dropping script completion");
            }
        }
    }

    fn clear_session(&self) {
        info!("surface: clear history, form data and ssl preferences");
        self.record(SurfaceRequest::ClearSession);
    }
}

/// `url` without its query and fragment, which carry credentials.
fn loggable_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => "<unparseable url>".to_string(),
    }
}

/// Loading indicator that only counts and logs.
#[derive(Debug, Default)]
pub struct CountingLoadingListener {
    shown: AtomicUsize,
    hidden: AtomicUsize,
    visible: AtomicBool,
}

impl CountingLoadingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    pub fn hidden(&self) -> usize {
        self.hidden.load(Ordering::SeqCst)
    }

    /// Whether the indicator is currently shown.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl PageLoadingListener for CountingLoadingListener {
    fn show_loading(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
        self.visible.store(true, Ordering::SeqCst);
        debug!("loading indicator shown");
    }

    fn hide_loading(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
        self.visible.store(false, Ordering::SeqCst);
        debug!("loading indicator hidden");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
