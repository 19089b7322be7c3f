//! Cere bridge harness: entry point.
//!
//! Runs the bridge headless.  A recording surface stands in for the web view
//! and a scenario file stands in for both the host application and the page,
//! so the init lifecycle, event routing and back-navigation can be exercised
//! without a device.
//!
//! # Usage
//!
//! ```text
//! cere-bridge --config <PATH> [OPTIONS]
//!
//! Options:
//!   --config    <PATH>   TOML file with [bridge] and [init] tables
//!   --scenario  <PATH>   JSON-lines scenario to replay [default: init only]
//!   --log-level <LEVEL>  Log filter when RUST_LOG is unset [default: info]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable               | Description                  |
//! |------------------------|------------------------------|
//! | `CERE_BRIDGE_CONFIG`   | Path to the harness config   |
//! | `CERE_BRIDGE_SCENARIO` | Path to the scenario file    |
//! | `RUST_LOG`             | Log filter, wins over flag   |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cere_bridge::application::instance;
use cere_bridge::infrastructure::{
    load_scenario, replay, CountingLoadingListener, HarnessConfig, QueuedSurface, ScenarioStep,
    StepOutcome, UiQueue,
};
use cere_bridge::{BridgeCore, Disposition};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Headless harness for the Cere native-to-web bridge.
#[derive(Debug, Parser)]
#[command(
    name = "cere-bridge",
    about = "Replays host calls and page signals against the Cere bridge",
    version
)]
struct Cli {
    /// Harness config file (TOML).
    #[arg(long, env = "CERE_BRIDGE_CONFIG")]
    config: PathBuf,

    /// Scenario file (one JSON step per line).
    ///
    /// Without a scenario only the `init` step runs.
    #[arg(long, env = "CERE_BRIDGE_SCENARIO")]
    scenario: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Loads the harness config and the steps to replay.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed.
    fn load_inputs(&self) -> anyhow::Result<(HarnessConfig, Vec<ScenarioStep>)> {
        let config = HarnessConfig::load(&self.config)
            .with_context(|| format!("loading config '{}'", self.config.display()))?;

        let steps = match &self.scenario {
            Some(path) => load_scenario(path)
                .with_context(|| format!("loading scenario '{}'", path.display()))?,
            None => vec![ScenarioStep::Init],
        };
        Ok((config, steps))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let (config, steps) = cli.load_inputs()?;
    info!(
        env = %config.init.environment,
        app_id = %config.init.app_id,
        auth_type = %config.init.auth_type,
        steps = steps.len(),
        "cere bridge harness starting"
    );

    let (queue, _ui_worker) = UiQueue::spawn();
    let surface = Arc::new(QueuedSurface::new(queue.clone()));
    let settings = config.bridge.clone();
    let core = {
        let surface = Arc::clone(&surface);
        instance::shared_or_init(move || BridgeCore::new(surface, settings))
    };

    let loading = Arc::new(CountingLoadingListener::new());
    register_logging_handlers(&core);
    core.set_page_loading_listener(loading.clone());

    let report = replay(Arc::clone(&core), config.init, steps, &queue).await?;

    for (index, outcome) in report.outcomes.iter().enumerate() {
        match outcome {
            StepOutcome::Rejected(reason) => warn!(index, %reason, "step rejected"),
            StepOutcome::BackPressed(handled) => info!(index, handled, "back pressed"),
            StepOutcome::Applied => {}
        }
    }
    info!(
        status = ?report.final_status,
        depth = report.back_stack.len(),
        pending = report.pending_event.as_ref().map(|e| e.event_type()),
        scripts = surface.scripts().len(),
        loading_shown = loading.shown(),
        loading_hidden = loading.hidden(),
        "cere bridge harness finished"
    );
    Ok(())
}

fn register_logging_handlers(core: &BridgeCore) {
    core.set_on_initialization_finished(|| info!("sdk initialised"));
    core.set_on_initialization_error(|reason| warn!(%reason, "sdk initialisation failed"));
    core.set_on_event_received(|event| {
        info!(event_type = event.event_type(), "event from page");
        Disposition::NotHandled
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────
