use thiserror::Error;

use crate::session::HostCallback;

pub const CONTROL_PREFIX: &str = "C ";
pub const TELEMETRY_PREFIX: &str = "T ";
pub const PROTOCOL_VERSION: &str = "v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChannel {
    Control,
    Telemetry,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub channel: LineChannel,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest<'a> {
    Init,
    StartSession {
        game_id: &'a str,
    },
    ReportScore {
        score: i64,
        metadata: &'a str,
        complete: bool,
    },
    GetSession {
        game_id: &'a str,
    },
    SetEquippedItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("empty control line")]
    Empty,
    #[error("unknown host callback '{0}'")]
    UnknownCallback(String),
}

pub fn parse_wire_line(raw: &str) -> ParsedLine {
    let trimmed = raw.trim_end_matches(['\r', '\n']);
    if let Some(payload) = trimmed.strip_prefix(CONTROL_PREFIX) {
        return ParsedLine {
            channel: LineChannel::Control,
            payload: payload.to_string(),
        };
    }
    if let Some(payload) = trimmed.strip_prefix(TELEMETRY_PREFIX) {
        return ParsedLine {
            channel: LineChannel::Telemetry,
            payload: payload.to_string(),
        };
    }
    ParsedLine {
        channel: LineChannel::Unknown,
        payload: trimmed.to_string(),
    }
}

impl HostRequest<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Init => "session.init",
            Self::StartSession { .. } => "session.start",
            Self::ReportScore { .. } => "session.report",
            Self::GetSession { .. } => "session.get",
            Self::SetEquippedItem => "equipped.set",
        }
    }

    /// Full outbound line including the control prefix, without the trailing newline.
    pub fn to_wire_line(&self) -> String {
        let head = format!("{CONTROL_PREFIX}{} {PROTOCOL_VERSION}", self.kind());
        match self {
            Self::Init | Self::SetEquippedItem => head,
            Self::StartSession { game_id } | Self::GetSession { game_id } => {
                format!("{head} game_id:{}", single_line(game_id))
            }
            Self::ReportScore {
                score,
                metadata,
                complete,
            } => format!(
                "{head} score:{score} complete:{complete} metadata:{}",
                single_line(metadata)
            ),
        }
    }
}

/// Parses the payload of an inbound control line into a host callback.
pub fn parse_callback(payload: &str) -> Result<HostCallback, WireError> {
    let payload = payload.trim_start();
    if payload.is_empty() {
        return Err(WireError::Empty);
    }
    let (name, rest) = match payload.split_once(' ') {
        Some((name, rest)) => (name, rest),
        None => (payload, ""),
    };
    let argument = rest.to_string();
    match name {
        "session.started" => Ok(HostCallback::SessionStarted(argument)),
        "session.error" => Ok(HostCallback::SessionError(argument)),
        "session.retrieved" => Ok(HostCallback::SessionRetrieved(argument)),
        "equipped.changed" => Ok(HostCallback::EquippedItemChanged(argument)),
        "inventory.data" => Ok(HostCallback::PlayerInventory(argument)),
        other => Err(WireError::UnknownCallback(other.to_string())),
    }
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
