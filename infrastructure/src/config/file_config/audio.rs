//! Audio output configuration from TOML (`[audio]` section)

use serde::{Deserialize, Serialize};

/// Raw audio configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAudioConfig {
    /// Directory rendered WAV clips are written to
    pub output_dir: Option<String>,
    /// Command used to play a clip; the WAV path is appended as the last
    /// argument. Clips are only written when unset.
    pub player: Option<String>,
}
