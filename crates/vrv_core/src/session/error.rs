use thiserror::Error;

use super::boundary::BoundaryError;
use super::state::SessionPhase;

pub type SessionResult<T = ()> = Result<T, SessionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    InvalidTransition,
    BoundaryFailure,
    MalformedPayload,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{operation} is not allowed while the session is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: SessionPhase,
    },
    #[error("Invalid session ID")]
    InvalidSession,
    #[error("{operation} failed at the host boundary: {source}")]
    Boundary {
        operation: &'static str,
        #[source]
        source: BoundaryError,
    },
    #[error("malformed {what}: {message}")]
    MalformedPayload { what: &'static str, message: String },
}

impl SessionError {
    pub fn kind(&self) -> SessionErrorKind {
        match self {
            Self::InvalidTransition { .. } | Self::InvalidSession => {
                SessionErrorKind::InvalidTransition
            }
            Self::Boundary { .. } => SessionErrorKind::BoundaryFailure,
            Self::MalformedPayload { .. } => SessionErrorKind::MalformedPayload,
        }
    }
}
