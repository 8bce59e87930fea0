use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use super::boundary::{BoundaryError, BoundaryReply, HostBoundary, HostCallback};
use super::payloads::ExternalSessionData;

/// Stands in for the host when none is attached. Session starts and retrievals are
/// answered immediately with generated ids.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    sequence: u64,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_stamp(&mut self) -> String {
        self.sequence = self.sequence.saturating_add(1);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        format!("{millis}_{}", self.sequence)
    }
}

impl HostBoundary for SimulatedHost {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn init_hooks(&mut self) -> Result<BoundaryReply, BoundaryError> {
        Ok(BoundaryReply::Pending)
    }

    fn start_session(&mut self, game_id: &str) -> Result<BoundaryReply, BoundaryError> {
        let session_id = format!("test_session_{}", self.next_stamp());
        info!(game_id, session_id = %session_id, "sim_session_start");
        Ok(BoundaryReply::Immediate(HostCallback::SessionStarted(
            session_id,
        )))
    }

    fn report_score(
        &mut self,
        score: i64,
        _metadata: &str,
        complete: bool,
    ) -> Result<BoundaryReply, BoundaryError> {
        info!(score, complete, "sim_score_report");
        Ok(BoundaryReply::Pending)
    }

    fn get_session(&mut self, game_id: &str) -> Result<BoundaryReply, BoundaryError> {
        let data = ExternalSessionData {
            game_id: game_id.to_string(),
            game_token: format!("sim_token_{}", self.next_stamp()),
        };
        let json = serde_json::to_string(&data).map_err(|error| BoundaryError::Rejected {
            request: "get_session",
            reason: format!("encode simulated session: {error}"),
        })?;
        info!(game_id, "sim_session_retrieval");
        Ok(BoundaryReply::Immediate(HostCallback::SessionRetrieved(
            json,
        )))
    }

    fn set_equipped_item(&mut self) -> Result<BoundaryReply, BoundaryError> {
        info!("sim_equipped_item_unavailable_without_host");
        Ok(BoundaryReply::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique_per_request() {
        let mut host = SimulatedHost::new();
        let first = host.start_session("g").expect("start");
        let second = host.start_session("g").expect("start");
        assert_ne!(first, second);
        let BoundaryReply::Immediate(HostCallback::SessionStarted(id)) = first else {
            panic!("expected immediate start callback");
        };
        assert!(id.starts_with("test_session_"));
    }

    #[test]
    fn retrieval_reply_carries_game_id_and_token() {
        let mut host = SimulatedHost::new();
        let reply = host.get_session("game-7").expect("get");
        let BoundaryReply::Immediate(HostCallback::SessionRetrieved(json)) = reply else {
            panic!("expected immediate retrieval callback");
        };
        let data: ExternalSessionData = serde_json::from_str(&json).expect("json");
        assert_eq!(data.game_id, "game-7");
        assert!(data.game_token.starts_with("sim_token_"));
    }
}
