//! BridgeCore: the state machine between the host application and the page.
//!
//! The core owns the init status, the back-navigation history and the host
//! callbacks, and routes events in both directions:
//!
//! ```text
//!             host                                     page
//!  init ────────────▶ validate ─▶ load URL ───────────▶ loads
//!                                                       │
//!  finished/error ◀── sdkInitialized / sdkInitializedError
//!
//!  sendEvent ───────▶ dispatch_event ─▶ evaluate script ─▶ remote.sendEvent
//!                           ▲
//!  intercept ◀── onEventReceived ◀──────────────────── page emits event
//! ```
//!
//! # Routing
//!
//! [`BridgeCore::dispatch_event`] branches on [`PredefinedEventType`]:
//!
//! | Event type               | Effect                                          |
//! |--------------------------|-------------------------------------------------|
//! | `PAGE_LOADED`            | confirm pending event, hide loading             |
//! | `NAVIGATE_PREVIOUS_PAGE` | pop history, re-send the new top (if any)       |
//! | `USER_LOGOUT`            | full reset                                      |
//! | anything else            | record as pending, forward to the page          |
//!
//! While `Uninitialised` (before the first `init` and after a logout) every
//! event except `USER_LOGOUT` is ignored and the history is left untouched.
//! Forwarding only happens while `Initialised`; otherwise it is a silent no-op.
//!
//! # Locking
//!
//! All mutable state sits behind one mutex.  Collaborators and host callbacks
//! are always invoked after the guard is released, so a callback may call
//! straight back into the bridge (for example `send_event` from the
//! init-finished handler).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};

use cere_core::{
    build_load_url, ConfigError, Event, InitConfig, InitStatus, PredefinedEventType,
    ScriptBuilder, ScriptError,
};

use crate::application::instance;
use crate::application::navigation::NavigationHistory;
use crate::domain::{
    BridgeSettings, Disposition, EventReceivedHandler, InitErrorHandler, InitFinishedHandler,
    JsResultHandler, SurfaceReadyHandler,
};

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors reported synchronously by the bridge.
///
/// Both variants are invalid-argument failures: the call that produced them
/// had no effect on the bridge state.  Initialization failures reported by the
/// page are not errors here; they arrive through the error callback.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The init config is missing a credential or has an unusable base URL.
    #[error("invalid init config: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// An event payload is not a JSON object.
    #[error(transparent)]
    InvalidPayload(#[from] ScriptError),
}

// ── Collaborator traits ───────────────────────────────────────────────────────

/// Completion callback for a script evaluation, receiving the result string.
pub type ScriptCompletion = Box<dyn FnOnce(String) + Send + 'static>;

/// The embedded web surface hosting the page.
///
/// All methods are fire-and-forget requests.  Their outcomes come back later
/// through the bridge's inbound entry points (`on_sdk_initialized`,
/// `on_sdk_initialized_error`, `on_event_received`, ...), which the surface
/// implementation must call on the same serial context it uses for
/// everything else.
pub trait WebSurface: Send + Sync {
    /// Starts loading `url`.
    fn load_url(&self, url: &str);

    /// Evaluates `script` in the page; `on_complete` receives the result.
    fn evaluate_script(&self, script: &str, on_complete: Option<ScriptCompletion>);

    /// Clears browsing history, form data and TLS trust overrides.
    fn clear_session(&self);
}

/// The host view's loading indicator.
#[cfg_attr(test, mockall::automock)]
pub trait PageLoadingListener: Send + Sync {
    /// Called just before an event is forwarded to the page.
    fn show_loading(&self);

    /// Called when the page confirms it rendered (`PAGE_LOADED`).
    fn hide_loading(&self);
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct BridgeState {
    status: InitStatus,
    history: NavigationHistory,
    on_init_finished: Option<InitFinishedHandler>,
    on_init_error: Option<InitErrorHandler>,
    on_event_received: Option<EventReceivedHandler>,
    loading_listener: Option<Arc<dyn PageLoadingListener>>,
    on_surface_ready: Option<SurfaceReadyHandler>,
    on_js_result: Option<JsResultHandler>,
}

/// The bridge between the host application and the hosted page.
///
/// Construct one explicitly with [`BridgeCore::new`] and share it through an
/// `Arc`, or use [`crate::application::instance`] when the platform needs a
/// process-wide instance.
pub struct BridgeCore {
    surface: Arc<dyn WebSurface>,
    settings: BridgeSettings,
    scripts: ScriptBuilder,
    state: Mutex<BridgeState>,
}

impl BridgeCore {
    /// Creates an uninitialised bridge driving `surface`.
    pub fn new(surface: Arc<dyn WebSurface>, settings: BridgeSettings) -> Self {
        let scripts = settings.script_builder();
        Self {
            surface,
            settings,
            scripts,
            state: Mutex::new(BridgeState::default()),
        }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    fn state(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Initialization ────────────────────────────────────────────────────────

    /// Starts (or restarts) initialization with `config`.
    ///
    /// Clears the navigation history, moves to `Initialising` and asks the
    /// surface to load the page.  Completion arrives later through
    /// [`on_sdk_initialized`](Self::on_sdk_initialized) or
    /// [`on_sdk_initialized_error`](Self::on_sdk_initialized_error).  Calling
    /// `init` while an attempt is in flight supersedes that attempt.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] if a credential required by the
    /// auth type is missing or blank, or the base URL is invalid.  The bridge
    /// state is unchanged in that case.
    pub fn init(&self, config: &InitConfig) -> Result<(), BridgeError> {
        let url = build_load_url(config, &self.settings.platform, &self.settings.sdk_version)?;

        {
            let mut state = self.state();
            state.history.clear();
            state.status = InitStatus::Initialising;
        }

        info!(
            app_id = %config.app_id,
            env = %config.environment,
            auth_type = %config.auth_type,
            base_url = %config.base_url,
            "loading bridge page"
        );
        self.surface.load_url(url.as_str());
        Ok(())
    }

    /// Inbound signal: the page finished initializing.
    ///
    /// Ignored unless an init attempt is in flight, so each `init` call
    /// completes at most once.
    pub fn on_sdk_initialized(&self) {
        let handler = {
            let mut state = self.state();
            if state.status != InitStatus::Initialising {
                warn!(status = ?state.status, "ignoring sdkInitialized outside of an init attempt");
                return;
            }
            state.status = InitStatus::Initialised;
            state.on_init_finished.clone()
        };

        info!("bridge initialised");
        if let Some(handler) = handler {
            handler();
        }
    }

    /// Inbound signal: the page failed to initialize with `reason`.
    pub fn on_sdk_initialized_error(&self, reason: &str) {
        let handler = {
            let mut state = self.state();
            if state.status != InitStatus::Initialising {
                warn!(status = ?state.status, reason, "ignoring sdkInitializedError outside of an init attempt");
                return;
            }
            state.status = InitStatus::InitialiseError(reason.to_string());
            state.on_init_error.clone()
        };

        warn!(reason, "bridge initialisation failed");
        if let Some(handler) = handler {
            handler(reason);
        }
    }

    pub fn init_status(&self) -> InitStatus {
        self.state().status.clone()
    }

    // ── Routing ───────────────────────────────────────────────────────────────

    /// Routes `event`; the single entry point for both host sends and
    /// un-intercepted page events.
    ///
    /// A no-op while `Uninitialised`, except for `USER_LOGOUT`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidPayload`] if a forwarded event's payload
    /// is not a JSON object.  Nothing is recorded or forwarded in that case.
    pub fn dispatch_event(&self, event: Event) -> Result<(), BridgeError> {
        let kind = event.predefined();
        if kind != Some(PredefinedEventType::UserLogout)
            && self.state().status == InitStatus::Uninitialised
        {
            debug!(event_type = event.event_type(), "bridge uninitialised; ignoring event");
            return Ok(());
        }

        match kind {
            Some(PredefinedEventType::PageLoaded) => {
                self.confirm_page_loaded();
                Ok(())
            }
            Some(PredefinedEventType::NavigatePreviousPage) => self.navigate_back(),
            Some(PredefinedEventType::UserLogout) => {
                self.logout();
                Ok(())
            }
            None => {
                let script = self.scripts.send_event(&event)?;
                let event_type = event.event_type().to_owned();
                self.state().history.set_pending(event);
                self.forward_to_surface(&event_type, &script, true);
                Ok(())
            }
        }
    }

    /// Sends `event` from the host; same as [`dispatch_event`](Self::dispatch_event).
    pub fn send_event(&self, event: Event) -> Result<(), BridgeError> {
        self.dispatch_event(event)
    }

    /// Sends `event` and remembers `on_ready` for the next time the page
    /// announces it is interactively available.
    ///
    /// # Errors
    ///
    /// Same as [`send_event`](Self::send_event); `on_ready` is discarded on
    /// error.
    pub fn send_event_for_start<F>(&self, event: Event, on_ready: F) -> Result<(), BridgeError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.state().on_surface_ready = Some(Box::new(on_ready));
        let result = self.send_event(event);
        if result.is_err() {
            self.state().on_surface_ready = None;
        }
        result
    }

    /// Sends `event` with a page-side signature over the current timestamp.
    ///
    /// Trusted events bypass routing: they do not touch the history or the
    /// loading indicator.  A no-op unless `Initialised`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidPayload`] if the payload is not a JSON
    /// object.
    pub fn send_trusted_event(&self, event: &Event) -> Result<(), BridgeError> {
        let script = self.scripts.send_trusted_event(event)?;
        self.forward_to_surface(event.event_type(), &script, false);
        Ok(())
    }

    /// Asks the page whether the user holds NFTs; the answer is delivered to
    /// `handler` through [`on_js_action_result`](Self::on_js_action_result).
    pub fn has_nfts<F>(&self, handler: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.state().on_js_result = Some(Arc::new(handler));
        let script = self.scripts.has_nfts();
        self.forward_to_surface("hasNfts", &script, false);
    }

    /// Handles the platform back button.
    ///
    /// Returns `true` if the history held more than one entry before the
    /// call, i.e. the bridge navigated within the page.  On `false` the host
    /// should fall back to its default back handling.
    pub fn on_back_pressed(&self) -> bool {
        let can_go_back = self.state().history.can_go_back();
        let back = Event::predefined_event(PredefinedEventType::NavigatePreviousPage);
        if let Err(e) = self.dispatch_event(back) {
            warn!(error = %e, "back navigation failed");
        }
        can_go_back
    }

    fn confirm_page_loaded(&self) {
        let listener = {
            let mut state = self.state();
            if state.history.confirm_pending() {
                debug!(depth = state.history.len(), "page confirmed");
            }
            state.loading_listener.clone()
        };
        if let Some(listener) = listener {
            listener.hide_loading();
        }
    }

    fn navigate_back(&self) -> Result<(), BridgeError> {
        let previous = self.state().history.navigate_back();
        match previous {
            Some(event) => {
                debug!(event_type = event.event_type(), "re-sending previous page");
                let script = self.scripts.send_event(&event)?;
                self.forward_to_surface(event.event_type(), &script, true);
            }
            None => debug!("navigation history exhausted"),
        }
        Ok(())
    }

    /// Evaluates `script` in the page if initialised.  Returns whether it was
    /// forwarded.
    fn forward_to_surface(&self, event_type: &str, script: &str, show_loading: bool) -> bool {
        let listener = {
            let state = self.state();
            if !state.status.is_initialised() {
                debug!(event_type, status = ?state.status, "bridge not initialised; not forwarding");
                return false;
            }
            state.loading_listener.clone()
        };

        if show_loading {
            if let Some(listener) = listener {
                listener.show_loading();
            }
        }

        debug!(event_type, "evaluating script");
        let event_type = event_type.to_owned();
        self.surface.evaluate_script(
            script,
            Some(Box::new(move |result| {
                debug!(event_type = %event_type, result = %result, "script evaluated");
            })),
        );
        true
    }

    // ── Inbound signals ───────────────────────────────────────────────────────

    /// Inbound signal: the page emitted an event.
    ///
    /// The registered intercept handler sees it first; unless it returns
    /// [`Disposition::Handled`], the event goes through default routing.
    pub fn on_event_received(&self, event_type: &str, payload: &str) {
        let event = Event::new(event_type, payload);
        debug!(event_type, "event received from page");

        let intercept = self.state().on_event_received.clone();
        if let Some(handler) = intercept {
            if handler(&event) == Disposition::Handled {
                debug!(event_type, "event handled by host");
                return;
            }
        }

        if let Err(e) = self.dispatch_event(event) {
            warn!(event_type, error = %e, "dropping event received from page");
        }
    }

    /// Inbound signal: the page became interactively available.
    ///
    /// Fires the callback stored by
    /// [`send_event_for_start`](Self::send_event_for_start), once.
    pub fn on_engagement_received(&self) {
        let on_ready = self.state().on_surface_ready.take();
        info!(pending_callback = on_ready.is_some(), "engagement received");
        if let Some(on_ready) = on_ready {
            on_ready();
        }
    }

    /// Inbound signal: a script reported `result` through the native interface.
    pub fn on_js_action_result(&self, result: &str) {
        let handler = self.state().on_js_result.clone();
        match handler {
            Some(handler) => handler(result),
            None => debug!(result, "no handler for script result"),
        }
    }

    // ── Logout ────────────────────────────────────────────────────────────────

    /// Full reset: clears the surface session, drops every callback, empties
    /// the history, returns to `Uninitialised` and releases the shared
    /// instance if this bridge is it.
    fn logout(&self) {
        info!("user logged out; resetting bridge");
        self.surface.clear_session();

        let previous = std::mem::take(&mut *self.state());
        drop(previous);

        if instance::release(self) {
            debug!("shared bridge instance released");
        }
    }

    // ── Host callbacks ────────────────────────────────────────────────────────

    pub fn set_on_initialization_finished<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state().on_init_finished = Some(Arc::new(handler));
    }

    pub fn set_on_initialization_error<F>(&self, handler: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.state().on_init_error = Some(Arc::new(handler));
    }

    /// Registers the inbound-event intercept handler.
    pub fn set_on_event_received<F>(&self, handler: F)
    where
        F: Fn(&Event) -> Disposition + Send + Sync + 'static,
    {
        self.state().on_event_received = Some(Arc::new(handler));
    }

    pub fn set_page_loading_listener(&self, listener: Arc<dyn PageLoadingListener>) {
        self.state().loading_listener = Some(listener);
    }

    /// Detaches the loading listener, e.g. when the host view is destroyed.
    pub fn clear_page_loading_listener(&self) {
        self.state().loading_listener = None;
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    /// Confirmed history entries, oldest first.
    pub fn back_stack(&self) -> Vec<Event> {
        self.state().history.entries().to_vec()
    }

    pub fn pending_event(&self) -> Option<Event> {
        self.state().history.pending().cloned()
    }

    pub fn can_go_back(&self) -> bool {
        self.state().history.can_go_back()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
