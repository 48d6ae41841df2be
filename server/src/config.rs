use core::time::Duration;

use serde::{Deserialize, Serialize};
use sweeper_core::Redaction;

use crate::Result;

/// Server settings, read from TOML. Every field is optional and falls back to its default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Idle time after which a session and all its games are dropped.
    pub session_ttl_secs: u64,
    /// Least recently seen sessions are evicted past this many.
    pub max_sessions: usize,
    pub max_games_per_session: usize,
    /// Withhold unrevealed cell values from clients while a game is running.
    pub redact_hidden: bool,
    pub cookie_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 60 * 60,
            max_sessions: 10_000,
            max_games_per_session: 16,
            redact_hidden: true,
            cookie_name: "sweeper_session".into(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn redaction(&self) -> Redaction {
        if self.redact_hidden {
            Redaction::HideUnrevealed
        } else {
            Redaction::ShowAll
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceError;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(ServerConfig::from_toml("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = ServerConfig::from_toml(
            r#"
            session_ttl_secs = 120
            redact_hidden = false
            "#,
        )
        .unwrap();

        assert_eq!(config.session_ttl(), Duration::from_secs(120));
        assert_eq!(config.redaction(), Redaction::ShowAll);
        assert_eq!(config.max_games_per_session, 16);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let result = ServerConfig::from_toml("session_ttl_secs = \"soon\"");
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }
}
