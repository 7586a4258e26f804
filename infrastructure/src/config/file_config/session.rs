//! Session defaults from TOML (`[session]` section)

use super::ConfigValidationError;
use clarity_application::SessionConfig;
use serde::{Deserialize, Serialize};

/// Raw session configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Party the user represents in obligation extraction
    pub user_party: String,
    /// Counterparty in obligation extraction
    pub other_party: String,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        let defaults = SessionConfig::default();
        Self {
            user_party: defaults.user_party,
            other_party: defaults.other_party,
        }
    }
}

impl FileSessionConfig {
    pub(super) fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        if self.user_party.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyValue {
                field: "session.user_party",
            });
        }
        if self.other_party.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyValue {
                field: "session.other_party",
            });
        }
        errors
    }

    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::with_parties(self.user_party.trim(), self.other_party.trim())
    }
}
