//! Infrastructure layer for legal-clarity
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading.

pub mod audio;
pub mod config;
pub mod gemini;
pub mod logging;

// Re-export commonly used types
pub use audio::WavFileAudioOutput;
pub use config::{
    ConfigLoader, ConfigValidationError, FileAudioConfig, FileConfig, FileLoggingConfig,
    FileModelConfig, FileSessionConfig, expand_home,
};
pub use gemini::{GeminiError, GeminiGateway};
pub use logging::JsonlFlowLogger;
