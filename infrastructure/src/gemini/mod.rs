//! Gemini REST adapter
//!
//! Implements the [`GenerativeModel`](clarity_application::GenerativeModel)
//! port on top of the `generateContent` endpoint. Structured capabilities
//! use JSON mode with a response schema; speech synthesis uses the audio
//! response modality and converts the returned PCM to a WAV `data:` URI.

pub mod error;
pub mod gateway;
mod wire;

pub use error::GeminiError;
pub use gateway::GeminiGateway;
