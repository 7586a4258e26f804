//! Flow and registry errors

use clarity_domain::{CapabilityName, SchemaViolation, TemplateError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a capability invocation failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// The caller's payload does not satisfy the input schema. No model call
    /// was made.
    #[error("Invalid input for {capability}: {violation}")]
    InvalidInput {
        capability: CapabilityName,
        violation: SchemaViolation,
    },

    /// The model answered with something that does not satisfy the output
    /// schema
    #[error("Invalid model output for {capability}: {reason}")]
    ModelOutputInvalid {
        capability: CapabilityName,
        reason: String,
    },

    /// The model service could not be reached or refused the call
    #[error("Model unavailable for {capability}: {reason}")]
    ModelUnavailable {
        capability: CapabilityName,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Lookup of a name that was never registered. A programming error, not
    /// a request error.
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),
}

/// Discriminant of [`FlowError`], for retry affordances and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowErrorKind {
    InvalidInput,
    ModelOutputInvalid,
    ModelUnavailable,
    Configuration,
    UnknownCapability,
}

impl FlowErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowErrorKind::InvalidInput => "invalid_input",
            FlowErrorKind::ModelOutputInvalid => "model_output_invalid",
            FlowErrorKind::ModelUnavailable => "model_unavailable",
            FlowErrorKind::Configuration => "configuration",
            FlowErrorKind::UnknownCapability => "unknown_capability",
        }
    }
}

impl fmt::Display for FlowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FlowError {
    pub fn kind(&self) -> FlowErrorKind {
        match self {
            FlowError::InvalidInput { .. } => FlowErrorKind::InvalidInput,
            FlowError::ModelOutputInvalid { .. } => FlowErrorKind::ModelOutputInvalid,
            FlowError::ModelUnavailable { .. } => FlowErrorKind::ModelUnavailable,
            FlowError::Configuration(_) => FlowErrorKind::Configuration,
            FlowError::UnknownCapability(_) => FlowErrorKind::UnknownCapability,
        }
    }

    /// Whether the caller may offer to run the same request again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FlowError::ModelOutputInvalid { .. } | FlowError::ModelUnavailable { .. }
        )
    }
}

/// Registration-time configuration defects
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("capability {0} registered twice")]
    Duplicate(CapabilityName),

    #[error("capability {0} has no prompt template")]
    MissingTemplate(CapabilityName),

    #[error("capability {capability} has an empty {which} schema")]
    MissingSchema {
        capability: CapabilityName,
        which: &'static str,
    },

    #[error(
        "capability {capability}: placeholders without input field {missing:?}, input fields without placeholder {unused:?}"
    )]
    PlaceholderMismatch {
        capability: CapabilityName,
        missing: Vec<String>,
        unused: Vec<String>,
    },

    #[error("capability {0} produces speech but its output schema is not a single text field")]
    SpeechOutputShape(CapabilityName),

    #[error("capabilities not registered: {0:?}")]
    Incomplete(Vec<CapabilityName>),

    #[error("prompt template error: {0}")]
    Template(#[from] TemplateError),
}

impl From<RegistryError> for FlowError {
    fn from(err: RegistryError) -> Self {
        FlowError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classes() {
        let unavailable = FlowError::ModelUnavailable {
            capability: CapabilityName::Summarize,
            reason: "timeout".to_string(),
        };
        let invalid_output = FlowError::ModelOutputInvalid {
            capability: CapabilityName::Summarize,
            reason: "null".to_string(),
        };
        let invalid_input = FlowError::InvalidInput {
            capability: CapabilityName::Summarize,
            violation: SchemaViolation::MissingField {
                path: "documentText".to_string(),
            },
        };

        assert!(unavailable.is_retryable());
        assert!(invalid_output.is_retryable());
        assert!(!invalid_input.is_retryable());
        assert!(!FlowError::Configuration("x".to_string()).is_retryable());
        assert!(!FlowError::UnknownCapability("x".to_string()).is_retryable());
    }

    #[test]
    fn test_display_names_capability() {
        let err = FlowError::InvalidInput {
            capability: CapabilityName::DraftContract,
            violation: SchemaViolation::NotPositive {
                path: "paymentAmount".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid input for draft-contract: `paymentAmount` must be a positive number"
        );
        assert_eq!(err.kind(), FlowErrorKind::InvalidInput);
    }
}
