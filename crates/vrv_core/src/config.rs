use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

pub const GAME_ID_ENV_VAR: &str = "VRV_GAME_ID";
pub const HOST_MODE_ENV_VAR: &str = "VRV_HOST_MODE";
pub const DEFAULT_GAME_ID: &str = "68229057eb9f31092a6afc8";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostMode {
    #[default]
    Simulated,
    Stdio,
}

impl HostMode {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Simulated => "sim",
            Self::Stdio => "stdio",
        }
    }
}

impl fmt::Display for HostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown host mode '{0}' (expected sim or stdio)")]
    UnknownHostMode(String),
}

impl FromStr for HostMode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sim" | "simulated" => Ok(Self::Simulated),
            "stdio" | "host" => Ok(Self::Stdio),
            _ => Err(ConfigError::UnknownHostMode(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub game_id: String,
    pub host_mode: HostMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_id: DEFAULT_GAME_ID.to_string(),
            host_mode: HostMode::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let game_id = lookup(GAME_ID_ENV_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_GAME_ID.to_string());

        let host_mode = match lookup(HOST_MODE_ENV_VAR).as_deref() {
            Some(value) => match value.parse::<HostMode>() {
                Ok(mode) => mode,
                Err(err) => {
                    warn!(
                        error = %err,
                        fallback = %HostMode::default(),
                        "host_mode_invalid_using_default"
                    );
                    HostMode::default()
                }
            },
            None => HostMode::default(),
        };

        Self { game_id, host_mode }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        assert_eq!(SessionConfig::from_lookup(|_| None), SessionConfig::default());
    }

    #[test]
    fn environment_overrides_are_trimmed_and_parsed() {
        let config = SessionConfig::from_lookup(lookup_from(&[
            (GAME_ID_ENV_VAR, "  game-42 "),
            (HOST_MODE_ENV_VAR, "STDIO"),
        ]));
        assert_eq!(config.game_id, "game-42");
        assert_eq!(config.host_mode, HostMode::Stdio);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = SessionConfig::from_lookup(lookup_from(&[
            (GAME_ID_ENV_VAR, "   "),
            (HOST_MODE_ENV_VAR, "carrier-pigeon"),
        ]));
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn host_mode_round_trips_through_token() {
        for mode in [HostMode::Simulated, HostMode::Stdio] {
            assert_eq!(mode.as_token().parse::<HostMode>(), Ok(mode));
        }
    }
}
