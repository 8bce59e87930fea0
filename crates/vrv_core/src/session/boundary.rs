use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("host write failed: {0}")]
    Io(#[from] io::Error),
    #[error("host rejected {request}: {reason}")]
    Rejected {
        request: &'static str,
        reason: String,
    },
    #[error("host connection is closed")]
    Disconnected,
}

/// Results the host delivers back through the lifecycle's callback entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCallback {
    SessionStarted(String),
    SessionError(String),
    SessionRetrieved(String),
    EquippedItemChanged(String),
    PlayerInventory(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryReply {
    /// The host answers later through a callback.
    Pending,
    /// The host answered synchronously; the callback is applied before the request returns.
    Immediate(HostCallback),
}

/// Outbound side of the host boundary.
///
/// Requests are one-way. Errors cover only the act of issuing the request; anything the
/// host decides afterwards arrives as a [`HostCallback`].
pub trait HostBoundary {
    fn name(&self) -> &'static str;

    fn init_hooks(&mut self) -> Result<BoundaryReply, BoundaryError>;

    fn start_session(&mut self, game_id: &str) -> Result<BoundaryReply, BoundaryError>;

    fn report_score(
        &mut self,
        score: i64,
        metadata: &str,
        complete: bool,
    ) -> Result<BoundaryReply, BoundaryError>;

    fn get_session(&mut self, game_id: &str) -> Result<BoundaryReply, BoundaryError>;

    fn set_equipped_item(&mut self) -> Result<BoundaryReply, BoundaryError>;
}
