use std::io;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vrv_core::{
    HostBoundary, HostMode, LineHost, SessionConfig, SessionEvent, SessionLifecycle,
    SimulatedHost,
};

pub(crate) struct AppWiring {
    pub(crate) config: SessionConfig,
    pub(crate) lifecycle: SessionLifecycle,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== VRV Session Shell Startup ===");

    let config = SessionConfig::from_env();
    let mut lifecycle = SessionLifecycle::from_config(&config, build_boundary(config.host_mode));
    lifecycle.subscribe(log_session_event);
    info!(
        game_id = %config.game_id,
        host_mode = %config.host_mode,
        boundary = lifecycle.boundary_name(),
        "session_shell_ready"
    );

    AppWiring { config, lifecycle }
}

pub(crate) fn build_boundary(mode: HostMode) -> Box<dyn HostBoundary> {
    match mode {
        HostMode::Simulated => Box::new(SimulatedHost::new()),
        // stdout carries the wire protocol; logs go to stderr.
        HostMode::Stdio => Box::new(LineHost::new(io::stdout())),
    }
}

fn log_session_event(event: &SessionEvent) {
    match event {
        SessionEvent::Started { session_id } => {
            info!(session_id = %session_id, "event_session_started")
        }
        SessionEvent::Ended { session_id } => {
            info!(session_id = %session_id, "event_session_ended")
        }
        SessionEvent::ScoreReported { score } => info!(score, "event_score_reported"),
        SessionEvent::Error { message } => warn!(reason = %message, "event_session_error"),
        SessionEvent::Retrieved { session_json } => {
            info!(length = session_json.len(), "event_session_retrieved")
        }
        SessionEvent::EquippedItemChanged(item) => {
            info!(item_name = %item.item_name, "event_equipped_item_changed")
        }
        SessionEvent::InventoryReceived(response) => info!(
            item_count = response.item_count(),
            total = response.total,
            "event_inventory_received"
        ),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
