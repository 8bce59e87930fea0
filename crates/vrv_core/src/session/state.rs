use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    Active,
}

impl SessionPhase {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SessionState {
    pub(crate) phase: SessionPhase,
    pub(crate) session_id: Option<String>,
    pub(crate) game_token: Option<String>,
    pub(crate) game_id: String,
    pub(crate) start_pending: bool,
}

impl SessionState {
    pub(crate) fn new(game_id: String) -> Self {
        Self {
            game_id,
            ..Self::default()
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub(crate) fn has_reportable_session(&self) -> bool {
        self.is_active()
            && self
                .session_id
                .as_deref()
                .is_some_and(|session_id| !session_id.is_empty())
    }

    pub(crate) fn activate(&mut self, session_id: String) {
        self.phase = SessionPhase::Active;
        self.session_id = Some(session_id);
        self.start_pending = false;
    }

    /// Returns the id of the session that was active, if any.
    pub(crate) fn reset(&mut self) -> Option<String> {
        self.phase = SessionPhase::Idle;
        self.game_token = None;
        self.start_pending = false;
        self.session_id.take()
    }
}
