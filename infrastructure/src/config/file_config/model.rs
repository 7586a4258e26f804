//! Model service configuration from TOML (`[model]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};

/// Raw model configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Model for structured capabilities
    pub text_model: String,
    /// Model for speech synthesis
    pub speech_model: String,
    /// Prebuilt voice name for speech synthesis
    pub voice: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Override for the REST endpoint (e.g. a proxy)
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Sampling temperature for capabilities that do not set their own
    pub temperature: Option<f32>,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            text_model: "gemini-2.5-flash".to_string(),
            speech_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Algenib".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: None,
            timeout_seconds: 60,
            temperature: None,
        }
    }
}

impl FileModelConfig {
    pub(super) fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let required = [
            ("model.text_model", &self.text_model),
            ("model.speech_model", &self.speech_model),
            ("model.voice", &self.voice),
            ("model.api_key_env", &self.api_key_env),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(ConfigValidationError::EmptyValue { field });
            }
        }
        if self.timeout_seconds == 0 {
            errors.push(ConfigValidationError::InvalidTimeout);
        }
        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            errors.push(ConfigValidationError::InvalidTemperature(t));
        }
        errors
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_out_of_range() {
        let config = FileModelConfig {
            temperature: Some(3.5),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::InvalidTemperature(3.5)]
        );
    }

    #[test]
    fn test_missing_api_key_env() {
        let config = FileModelConfig {
            api_key_env: "LEGAL_CLARITY_TEST_UNSET_KEY_VARIABLE".to_string(),
            ..Default::default()
        };
        assert!(config.api_key().is_none());
    }
}
