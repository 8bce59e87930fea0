use std::fmt;

use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::inventory::parse_inventory_response;

use super::boundary::{BoundaryError, BoundaryReply, HostBoundary, HostCallback};
use super::error::{SessionError, SessionResult};
use super::events::{EventBus, SessionEvent, SessionObserver, SubscriptionId};
use super::payloads::{decode_payload, EquippedItem, ExternalSessionData};
use super::state::{SessionPhase, SessionState};

pub const DEFAULT_SCORE_METADATA: &str = "{}";
const INVALID_SESSION_MESSAGE: &str = "Invalid session ID";

/// Owns the session state and is its only writer.
///
/// Operations run synchronously on the caller's thread. Host failures and malformed
/// host payloads become [`SessionEvent::Error`] events plus an `Err` return; nothing
/// here panics on bad input.
pub struct SessionLifecycle {
    state: SessionState,
    boundary: Box<dyn HostBoundary>,
    events: EventBus,
}

impl fmt::Debug for SessionLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionLifecycle")
            .field("state", &self.state)
            .field("boundary", &self.boundary.name())
            .field("events", &self.events)
            .finish()
    }
}

impl SessionLifecycle {
    pub fn new(game_id: impl Into<String>, mut boundary: Box<dyn HostBoundary>) -> Self {
        let game_id = game_id.into();
        match boundary.init_hooks() {
            Ok(_) => info!(
                boundary = boundary.name(),
                game_id = %game_id,
                "session_hooks_initialized"
            ),
            Err(err) => warn!(
                boundary = boundary.name(),
                error = %err,
                "session_hooks_init_failed"
            ),
        }

        Self {
            state: SessionState::new(game_id),
            boundary,
            events: EventBus::new(),
        }
    }

    pub fn from_config(config: &SessionConfig, boundary: Box<dyn HostBoundary>) -> Self {
        Self::new(config.game_id.clone(), boundary)
    }

    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: SessionObserver + 'static,
    {
        self.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn is_session_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_start_pending(&self) -> bool {
        self.state.start_pending
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.state.session_id.as_deref()
    }

    pub fn game_id(&self) -> &str {
        &self.state.game_id
    }

    pub fn game_token(&self) -> Option<&str> {
        self.state.game_token.as_deref()
    }

    pub fn has_valid_token(&self) -> bool {
        self.state
            .game_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    pub fn boundary_name(&self) -> &'static str {
        self.boundary.name()
    }

    pub fn start_session(&mut self) -> SessionResult {
        if self.state.is_active() {
            warn!(
                session_id = self.current_session_id().unwrap_or_default(),
                "session_start_ignored_already_active"
            );
            return Err(SessionError::InvalidTransition {
                operation: "start_session",
                phase: SessionPhase::Active,
            });
        }
        // A host that never answered must not block a retry from Idle.
        if self.state.start_pending {
            warn!(game_id = %self.state.game_id, "session_start_reissued_request_pending");
        } else {
            info!(game_id = %self.state.game_id, "session_start_requested");
        }
        match self.boundary.start_session(&self.state.game_id) {
            Ok(reply) => {
                self.state.start_pending = true;
                self.apply_reply(reply)
            }
            Err(source) => Err(self.boundary_failure("start_session", "start session", source)),
        }
    }

    /// Starts a session unless one is already active or being started.
    pub fn ensure_session_started(&mut self) -> SessionResult {
        if self.state.is_active() || self.state.start_pending {
            return Ok(());
        }
        self.start_session()
    }

    pub fn report_score(&mut self, score: i64, metadata: &str, complete: bool) -> SessionResult {
        if !self.state.has_reportable_session() {
            warn!(
                score,
                phase = %self.state.phase,
                "score_report_rejected_invalid_session"
            );
            self.emit(SessionEvent::Error {
                message: INVALID_SESSION_MESSAGE.to_string(),
            });
            return Err(SessionError::InvalidSession);
        }

        info!(score, complete, "score_report_requested");
        let reply = match self.boundary.report_score(score, metadata, complete) {
            Ok(reply) => reply,
            Err(source) => {
                return Err(self.boundary_failure("report_score", "report score", source));
            }
        };
        self.emit(SessionEvent::ScoreReported { score });
        self.apply_reply(reply)?;

        if complete && self.state.is_active() {
            self.end_session()?;
        }
        Ok(())
    }

    pub fn end_session(&mut self) -> SessionResult {
        if !self.state.is_active() {
            warn!("session_end_ignored_no_active_session");
            return Err(SessionError::InvalidTransition {
                operation: "end_session",
                phase: self.state.phase,
            });
        }

        let session_id = self.state.reset().unwrap_or_default();
        info!(session_id = %session_id, "session_ended");
        self.emit(SessionEvent::Ended { session_id });
        Ok(())
    }

    pub fn retrieve_session(&mut self) -> SessionResult {
        info!(game_id = %self.state.game_id, "session_retrieve_requested");
        match self.boundary.get_session(&self.state.game_id) {
            Ok(reply) => self.apply_reply(reply),
            Err(source) => Err(self.boundary_failure(
                "retrieve_session",
                "retrieve session",
                source,
            )),
        }
    }

    pub fn set_game_id(&mut self, game_id: impl Into<String>) -> SessionResult {
        let game_id = game_id.into();
        if self.state.is_active() {
            warn!(requested = %game_id, "game_id_change_rejected_session_active");
            return Err(SessionError::InvalidTransition {
                operation: "set_game_id",
                phase: SessionPhase::Active,
            });
        }
        info!(game_id = %game_id, "game_id_updated");
        self.state.game_id = game_id;
        Ok(())
    }

    pub fn request_equipped_item(&mut self) -> SessionResult {
        debug!("equipped_item_requested");
        match self.boundary.set_equipped_item() {
            Ok(reply) => self.apply_reply(reply),
            Err(source) => Err(self.boundary_failure(
                "request_equipped_item",
                "request equipped item",
                source,
            )),
        }
    }

    pub fn handle_callback(&mut self, callback: HostCallback) -> SessionResult {
        match callback {
            HostCallback::SessionStarted(session_id) => self.on_session_started(&session_id),
            HostCallback::SessionError(message) => {
                self.on_session_error(&message);
                Ok(())
            }
            HostCallback::SessionRetrieved(json) => self.on_session_retrieved(&json),
            HostCallback::EquippedItemChanged(json) => self.on_equipped_item_changed(&json),
            HostCallback::PlayerInventory(raw) => {
                self.on_player_inventory(&raw);
                Ok(())
            }
        }
    }

    pub fn on_session_started(&mut self, session_id: &str) -> SessionResult {
        self.state.start_pending = false;
        if session_id.trim().is_empty() {
            error!("session_started_callback_missing_id");
            self.emit(SessionEvent::Error {
                message: INVALID_SESSION_MESSAGE.to_string(),
            });
            return Err(SessionError::InvalidSession);
        }
        if self.state.is_active() {
            warn!(
                current = self.current_session_id().unwrap_or_default(),
                incoming = session_id,
                "session_started_callback_ignored_already_active"
            );
            return Err(SessionError::InvalidTransition {
                operation: "on_session_started",
                phase: SessionPhase::Active,
            });
        }

        self.state.activate(session_id.to_string());
        info!(session_id, "session_started");
        self.emit(SessionEvent::Started {
            session_id: session_id.to_string(),
        });
        Ok(())
    }

    pub fn on_session_error(&mut self, message: &str) {
        self.state.start_pending = false;
        error!(reason = message, phase = %self.state.phase, "session_error_reported");
        self.emit(SessionEvent::Error {
            message: message.to_string(),
        });
    }

    pub fn on_session_retrieved(&mut self, session_json: &str) -> SessionResult {
        let data = match decode_payload::<ExternalSessionData>(session_json) {
            Ok(data) => data,
            Err(message) => {
                error!(error = %message, "session_data_parse_failed");
                self.emit(SessionEvent::Error {
                    message: format!("Failed to parse session data: {message}"),
                });
                return Err(SessionError::MalformedPayload {
                    what: "session data",
                    message,
                });
            }
        };

        if !data.game_token.is_empty() {
            self.state.game_token = Some(data.game_token);
            debug!("session_token_stored");
        }
        if !data.game_id.is_empty() && data.game_id != self.state.game_id {
            if self.state.is_active() {
                warn!(
                    current = %self.state.game_id,
                    retrieved = %data.game_id,
                    "retrieved_game_id_ignored_session_active"
                );
            } else {
                self.state.game_id = data.game_id;
            }
        }

        info!(game_id = %self.state.game_id, "session_retrieved");
        self.emit(SessionEvent::Retrieved {
            session_json: session_json.to_string(),
        });
        Ok(())
    }

    pub fn on_equipped_item_changed(&mut self, item_json: &str) -> SessionResult {
        let item = decode_payload::<EquippedItem>(item_json)
            .and_then(|item| item.validate().map(|()| item));
        match item {
            Ok(item) => {
                info!(
                    item_name = %item.item_name,
                    item_glb_url = %item.item_glb_url,
                    "equipped_item_changed"
                );
                self.emit(SessionEvent::EquippedItemChanged(item));
                Ok(())
            }
            Err(message) => {
                error!(error = %message, "equipped_item_parse_failed");
                self.emit(SessionEvent::Error {
                    message: format!("Failed to parse equipped item: {message}"),
                });
                Err(SessionError::MalformedPayload {
                    what: "equipped item",
                    message,
                })
            }
        }
    }

    pub fn on_player_inventory(&mut self, raw: &str) {
        let response = parse_inventory_response(raw);
        info!(
            item_count = response.item_count(),
            total = response.total,
            "player_inventory_received"
        );
        self.emit(SessionEvent::InventoryReceived(response));
    }

    fn apply_reply(&mut self, reply: BoundaryReply) -> SessionResult {
        match reply {
            BoundaryReply::Pending => Ok(()),
            BoundaryReply::Immediate(callback) => self.handle_callback(callback),
        }
    }

    fn boundary_failure(
        &mut self,
        operation: &'static str,
        action: &str,
        source: BoundaryError,
    ) -> SessionError {
        error!(operation, error = %source, "host_boundary_call_failed");
        self.emit(SessionEvent::Error {
            message: format!("Failed to {action}: {source}"),
        });
        SessionError::Boundary { operation, source }
    }

    fn emit(&mut self, event: SessionEvent) {
        debug!(event = event.name(), "session_event");
        self.events.publish(&event);
    }
}
