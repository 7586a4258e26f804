//! Generative model port
//!
//! Defines the interface the flow executor uses to reach a language model.
//! Only the executor calls it.

use async_trait::async_trait;
use clarity_domain::{AudioRef, CapabilityName};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while calling the model service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The service answered, but the answer could not be read as the
    /// requested kind of output
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// True when the service replied with something unusable, as opposed to
    /// not replying at all
    pub fn is_malformed(&self) -> bool {
        matches!(self, GatewayError::MalformedResponse(_))
    }
}

/// Shape the model is asked to produce
#[derive(Debug, Clone, PartialEq)]
pub enum OutputConstraint {
    /// JSON matching this JSON Schema
    Structured(Value),
    /// Synthesized speech
    Speech,
}

/// One rendered model call
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub capability: CapabilityName,
    pub prompt: String,
    pub output: OutputConstraint,
    pub temperature: Option<f32>,
}

impl ModelRequest {
    pub fn is_speech(&self) -> bool {
        self.output == OutputConstraint::Speech
    }
}

/// Raw model answer, before output validation
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Structured(Value),
    Speech(AudioRef),
}

/// Gateway to a generative model service
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, GatewayError>;
}
