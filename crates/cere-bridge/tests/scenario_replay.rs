//! Integration tests: scenarios replayed through the UI queue.
//!
//! Each test wires a real [`BridgeCore`] to a [`QueuedSurface`] and a
//! [`CountingLoadingListener`], replays host calls and page signals with
//! [`replay`], and checks the report and the recorded surface requests.

use std::sync::Arc;

use cere_bridge::infrastructure::{
    parse_scenario, replay, CountingLoadingListener, QueuedSurface, ScenarioStep, StepOutcome,
    SurfaceRequest, UiQueue,
};
use cere_bridge::{AuthType, BridgeCore, BridgeSettings, Event, InitConfig, InitStatus};

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Harness {
    queue: UiQueue,
    surface: Arc<QueuedSurface>,
    loading: Arc<CountingLoadingListener>,
    core: Arc<BridgeCore>,
}

fn harness() -> Harness {
    let (queue, _worker) = UiQueue::spawn();
    let surface = Arc::new(QueuedSurface::new(queue.clone()));
    let loading = Arc::new(CountingLoadingListener::new());
    let core = Arc::new(BridgeCore::new(surface.clone(), BridgeSettings::default()));
    core.set_page_loading_listener(loading.clone());
    Harness {
        queue,
        surface,
        loading,
        core,
    }
}

fn token_config() -> InitConfig {
    InitConfig::new("2095", "partner-user-1", AuthType::Oauth2).with_access_token("tok-123")
}

fn send(event_type: &str) -> ScenarioStep {
    ScenarioStep::SendEvent {
        event_type: event_type.to_string(),
        payload: "{}".to_string(),
    }
}

fn received(event: &str) -> ScenarioStep {
    ScenarioStep::EventReceived {
        event: event.to_string(),
        payload: String::new(),
    }
}

fn boot() -> Vec<ScenarioStep> {
    vec![ScenarioStep::Init, ScenarioStep::SdkInitialized]
}

// ── Init ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_init_loads_url_with_access_token_only() {
    // Arrange
    let h = harness();

    // Act
    let report = replay(h.core.clone(), token_config(), boot(), &h.queue)
        .await
        .unwrap();

    // Assert
    assert_eq!(report.final_status, InitStatus::Initialised);
    let urls = h.surface.loaded_urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("accessToken=tok-123"));
    assert!(!urls[0].contains("email="));
    assert!(!urls[0].contains("password="));
}

#[tokio::test]
async fn test_init_with_blank_token_is_rejected_without_loading() {
    let h = harness();
    let config = InitConfig::new("2095", "partner-user-1", AuthType::Firebase).with_access_token("  ");

    let report = replay(h.core.clone(), config, vec![ScenarioStep::Init], &h.queue)
        .await
        .unwrap();

    match &report.outcomes[0] {
        StepOutcome::Rejected(reason) => assert!(reason.contains("accessToken")),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(report.final_status, InitStatus::Uninitialised);
    assert!(h.surface.loaded_urls().is_empty());
}

#[tokio::test]
async fn test_init_error_then_late_success_is_ignored() {
    let h = harness();
    let steps = vec![
        ScenarioStep::Init,
        ScenarioStep::SdkInitializedError {
            error: "boom".to_string(),
        },
        ScenarioStep::SdkInitialized,
    ];

    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    assert_eq!(report.final_status, InitStatus::InitialiseError("boom".to_string()));
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_page_loaded_confirms_pending_event() {
    // Arrange
    let h = harness();
    let mut steps = boot();
    steps.push(send("OPEN_WALLET"));

    // Act: first half, up to the send
    let before = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();
    let visible_while_pending = h.loading.is_visible();
    // Act: the page confirms
    let after = replay(
        h.core.clone(),
        token_config(),
        vec![received("PAGE_LOADED")],
        &h.queue,
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(
        before.pending_event,
        Some(Event::new("OPEN_WALLET", "{}"))
    );
    assert!(before.back_stack.is_empty());
    assert!(visible_while_pending);

    assert_eq!(after.pending_event, None);
    assert_eq!(after.back_stack, vec![Event::new("OPEN_WALLET", "{}")]);
    assert_eq!(h.loading.hidden(), 1);
    assert!(!h.loading.is_visible());
}

#[tokio::test]
async fn test_back_navigation_re_forwards_previous_page() {
    // Arrange
    let h = harness();
    let mut steps = boot();
    steps.extend([
        send("OPEN_WALLET"),
        received("PAGE_LOADED"),
        send("OPEN_REWARDS"),
        received("PAGE_LOADED"),
        ScenarioStep::BackPressed,
    ]);

    // Act
    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    // Assert
    assert_eq!(report.outcomes.last(), Some(&StepOutcome::BackPressed(true)));
    assert_eq!(report.back_stack, vec![Event::new("OPEN_WALLET", "{}")]);
    let scripts = h.surface.scripts();
    assert_eq!(scripts.len(), 3);
    assert!(scripts[2].contains("\"OPEN_WALLET\""));
}

#[tokio::test]
async fn test_back_pressed_on_single_page_falls_back_to_host() {
    let h = harness();
    let mut steps = boot();
    steps.extend([
        send("OPEN_WALLET"),
        received("PAGE_LOADED"),
        ScenarioStep::BackPressed,
        ScenarioStep::BackPressed,
    ]);

    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    let tail = &report.outcomes[report.outcomes.len() - 2..];
    assert_eq!(
        tail,
        &[StepOutcome::BackPressed(false), StepOutcome::BackPressed(false)]
    );
    assert!(report.back_stack.is_empty());
}

#[tokio::test]
async fn test_events_before_init_are_not_forwarded() {
    let h = harness();
    let steps = vec![send("OPEN_WALLET"), ScenarioStep::Init, send("OPEN_REWARDS")];

    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    assert_eq!(report.final_status, InitStatus::Initialising);
    assert!(h.surface.scripts().is_empty());
    assert_eq!(h.loading.shown(), 0);
}

#[tokio::test]
async fn test_non_object_payload_is_rejected() {
    let h = harness();
    let mut steps = boot();
    steps.push(ScenarioStep::SendEvent {
        event_type: "OPEN_WALLET".to_string(),
        payload: "[1, 2]".to_string(),
    });

    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    assert!(matches!(report.outcomes[2], StepOutcome::Rejected(_)));
    assert_eq!(report.pending_event, None);
    assert!(h.surface.scripts().is_empty());
}

// ── Logout ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_logout_resets_bridge_and_silences_sends() {
    // Arrange
    let h = harness();
    let mut steps = boot();
    steps.extend([
        send("OPEN_WALLET"),
        received("PAGE_LOADED"),
        received("USER_LOGOUT"),
        send("OPEN_REWARDS"),
    ]);

    // Act
    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    // Assert
    assert_eq!(report.final_status, InitStatus::Uninitialised);
    assert!(report.back_stack.is_empty());
    assert_eq!(report.pending_event, None);
    assert_eq!(h.surface.scripts().len(), 1);
    assert!(h.surface.requests().contains(&SurfaceRequest::ClearSession));
}

// ── Supplemented calls ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ready_callback_fires_once_on_engagement() {
    let h = harness();
    let mut steps = boot();
    steps.extend([
        ScenarioStep::SendEventForStart {
            event_type: "OPEN_WALLET".to_string(),
            payload: String::new(),
        },
        ScenarioStep::Engagement,
        ScenarioStep::Engagement,
    ]);

    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    assert_eq!(report.ready_callbacks, 1);
}

#[tokio::test]
async fn test_has_nfts_result_reaches_handler() {
    let h = harness();
    let mut steps = boot();
    steps.extend([
        ScenarioStep::HasNfts,
        ScenarioStep::JsActionResult {
            result: "true".to_string(),
        },
    ]);

    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    assert_eq!(report.js_results, vec!["true".to_string()]);
    assert!(h.surface.scripts()[0].contains("hasNfts"));
}

#[tokio::test]
async fn test_trusted_event_leaves_history_and_loading_alone() {
    let h = harness();
    let mut steps = boot();
    steps.push(ScenarioStep::SendTrustedEvent {
        event_type: "QUEST_DONE".to_string(),
        payload: r#"{"quest":7}"#.to_string(),
    });

    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    assert_eq!(report.pending_event, None);
    assert_eq!(h.loading.shown(), 0);
    let scripts = h.surface.scripts();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("signMessage"));
}

// ── Scenario text ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_parsed_scenario_replays_end_to_end() {
    let text = r#"
        # boot the page
        {"step":"init"}
        {"step":"sdk_initialized"}

        # open two pages, go back once
        {"step":"send_event","event_type":"OPEN_WALLET","payload":"{\"tab\":\"nfts\"}"}
        {"step":"event_received","event":"PAGE_LOADED"}
        {"step":"send_event","event_type":"OPEN_REWARDS"}
        {"step":"event_received","event":"PAGE_LOADED"}
        {"step":"event_received","event":"NAVIGATE_PREVIOUS_PAGE"}
    "#;
    let steps = parse_scenario(text).unwrap();
    let h = harness();

    let report = replay(h.core.clone(), token_config(), steps, &h.queue)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 7);
    assert_eq!(report.back_stack.len(), 1);
    assert_eq!(report.back_stack[0].event_type(), "OPEN_WALLET");
}
