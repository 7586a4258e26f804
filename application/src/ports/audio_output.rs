//! Audio output port
//!
//! Plays synthesized clips. The orchestrator's playback state machine decides
//! what to start and stop; adapters only carry it out.

use clarity_domain::{AudioKey, AudioRef};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioOutputError {
    #[error("Unsupported audio reference: {0}")]
    Unsupported(String),

    #[error("Audio output failed: {0}")]
    Failed(String),
}

pub trait AudioOutput: Send + Sync {
    /// Start playing `clip` under `key`
    fn start(&self, key: &AudioKey, clip: &AudioRef) -> Result<(), AudioOutputError>;

    /// Stop the clip started under `key`. Unknown keys are ignored.
    fn stop(&self, key: &AudioKey);

    /// Whether the clip started under `key` is still audible
    fn is_playing(&self, key: &AudioKey) -> bool;
}

/// Output that accepts every clip and plays nothing
pub struct SilentAudioOutput;

impl AudioOutput for SilentAudioOutput {
    fn start(&self, _key: &AudioKey, _clip: &AudioRef) -> Result<(), AudioOutputError> {
        Ok(())
    }

    fn stop(&self, _key: &AudioKey) {}

    fn is_playing(&self, _key: &AudioKey) -> bool {
        false
    }
}
