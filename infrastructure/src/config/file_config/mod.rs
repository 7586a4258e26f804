//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application types where
//! the application needs them.

mod audio;
mod logging;
mod model;
mod session;

pub use audio::FileAudioConfig;
pub use logging::FileLoggingConfig;
pub use model::FileModelConfig;
pub use session::FileSessionConfig;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("model.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("{field} cannot be empty")]
    EmptyValue { field: &'static str },

    #[error("model.temperature must be within 0.0..=2.0, got {0}")]
    InvalidTemperature(f32),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model service settings
    pub model: FileModelConfig,
    /// Default obligation parties
    pub session: FileSessionConfig,
    /// Rendered clip output
    pub audio: FileAudioConfig,
    /// Flow transcript
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected problems.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = self.model.validate();
        errors.extend(self.session.validate());
        errors
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/").zip(dirs::home_dir()) {
        Some((rest, home)) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[model]
text_model = "gemini-2.5-pro"
voice = "Kore"
timeout_seconds = 20
temperature = 0.3

[session]
user_party = "FREELANCER"
other_party = "CLIENT"

[audio]
output_dir = "~/.cache/legal-clarity/audio"
player = "aplay -q"

[logging]
conversation_log = "flows.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.text_model, "gemini-2.5-pro");
        assert_eq!(config.model.speech_model, "gemini-2.5-flash-preview-tts");
        assert_eq!(config.model.temperature, Some(0.3));
        assert_eq!(config.session.other_party, "CLIENT");
        assert_eq!(config.audio.player.as_deref(), Some("aplay -q"));
        assert_eq!(config.logging.conversation_log.as_deref(), Some("flows.jsonl"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[session]\nuser_party = \"BUYER\"\n").unwrap();
        assert_eq!(config.session.user_party, "BUYER");
        assert_eq!(config.session.other_party, "LANDLORD");
        assert_eq!(config.model, FileModelConfig::default());
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let toml_str = r#"
[model]
text_model = " "
timeout_seconds = 0

[session]
other_party = ""
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let errors = config.validate();
        assert!(errors.contains(&ConfigValidationError::InvalidTimeout));
        assert!(errors.contains(&ConfigValidationError::EmptyValue {
            field: "model.text_model"
        }));
        assert!(errors.contains(&ConfigValidationError::EmptyValue {
            field: "session.other_party"
        }));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/var/log/x.jsonl"), PathBuf::from("/var/log/x.jsonl"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/clips"), home.join("clips"));
        }
    }
}
