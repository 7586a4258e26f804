//! Audio clips, the per-session audio cache and the playback state machine

pub mod cache;
pub mod playback;

pub use cache::AudioCache;
pub use playback::{ClipState, PlayDecision, PlaybackError, PlaybackMachine};

use crate::capability::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to playable encoded audio (a `data:` URI)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioRef(String);

impl AudioRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type of a `data:` URI, if present
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        Some(&rest[..end])
    }
}

impl fmt::Display for AudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a clip in the audio cache
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioKey {
    /// Spoken rendition of a text in a given language
    Text { text: String, language: Language },
    /// Spoken rendition of a conversation turn
    Turn(usize),
}

impl AudioKey {
    pub fn text(text: impl Into<String>, language: Language) -> Self {
        AudioKey::Text {
            text: text.into(),
            language,
        }
    }
}

impl fmt::Display for AudioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioKey::Text { language, .. } => write!(f, "text ({})", language),
            AudioKey::Turn(i) => write!(f, "turn #{}", i),
        }
    }
}
