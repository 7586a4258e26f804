//! Error types for the Gemini adapter

use crate::audio::AudioEncodingError;
use clarity_application::GatewayError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the Gemini API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("API key not set: export {0}")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gemini returned no usable content: {0}")]
    EmptyResponse(String),

    #[error("Failed to parse model output: {error}\nRaw output: {raw}")]
    ParseError { error: String, raw: String },

    #[error("Audio encoding failed: {0}")]
    Audio(#[from] AudioEncodingError),
}

impl From<GeminiError> for GatewayError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            GeminiError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            GeminiError::Http(e) => GatewayError::RequestFailed(e.to_string()),
            GeminiError::Api { status, message } => match StatusCode::from_u16(status) {
                Ok(StatusCode::TOO_MANY_REQUESTS) => GatewayError::RateLimited(message),
                Ok(
                    StatusCode::INTERNAL_SERVER_ERROR
                    | StatusCode::BAD_GATEWAY
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT,
                ) => GatewayError::ServiceUnavailable(message),
                _ => GatewayError::RequestFailed(format!("status {}: {}", status, message)),
            },
            GeminiError::MissingApiKey(_) => GatewayError::RequestFailed(err.to_string()),
            GeminiError::EmptyResponse(_) | GeminiError::ParseError { .. } | GeminiError::Audio(_) => {
                GatewayError::MalformedResponse(err.to_string())
            }
        }
    }
}
