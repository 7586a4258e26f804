//! WAV file audio output.
//!
//! Each clip is written to `<output_dir>/<clip>.wav`. When a player command
//! is configured it is spawned with the file path as its last argument, and
//! the clip counts as playing until that process exits.

use super::wav::decode_data_uri;
use clarity_application::ports::audio_output::{AudioOutput, AudioOutputError};
use clarity_domain::{AudioKey, AudioRef};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

struct ActiveClip {
    key: AudioKey,
    player: Option<Child>,
}

pub struct WavFileAudioOutput {
    output_dir: PathBuf,
    player: Option<Vec<String>>,
    active: Mutex<Option<ActiveClip>>,
}

impl WavFileAudioOutput {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            player: None,
            active: Mutex::new(None),
        }
    }

    /// Play clips with `command`, e.g. `aplay -q` or `afplay`
    pub fn with_player(mut self, command: &str) -> Self {
        let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        self.player = (!parts.is_empty()).then_some(parts);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the clip for `key` is written
    pub fn clip_path(&self, key: &AudioKey) -> PathBuf {
        let name = match key {
            // questions and answers alternate, so answers sit at odd indexes
            AudioKey::Turn(index) => format!("answer-{}.wav", index / 2 + 1),
            AudioKey::Text { text, language } => {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                format!(
                    "summary-{}-{:016x}.wav",
                    language.as_str().to_lowercase(),
                    hasher.finish()
                )
            }
        };
        self.output_dir.join(name)
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveClip>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_clip(&self, key: &AudioKey, clip: &AudioRef) -> Result<PathBuf, AudioOutputError> {
        let (mime_type, bytes) =
            decode_data_uri(clip.as_str()).map_err(|e| AudioOutputError::Unsupported(e.to_string()))?;
        if mime_type != "audio/wav" {
            return Err(AudioOutputError::Unsupported(mime_type));
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            AudioOutputError::Failed(format!(
                "could not create {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let path = self.clip_path(key);
        std::fs::write(&path, bytes)
            .map_err(|e| AudioOutputError::Failed(format!("could not write {}: {}", path.display(), e)))?;
        Ok(path)
    }

    fn spawn_player(&self, path: &Path) -> Result<Option<Child>, AudioOutputError> {
        let Some((program, args)) = self.player.as_ref().and_then(|p| p.split_first()) else {
            return Ok(None);
        };
        Command::new(program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(Some)
            .map_err(|e| AudioOutputError::Failed(format!("could not start {}: {}", program, e)))
    }
}

fn halt(mut clip: ActiveClip) {
    if let Some(mut child) = clip.player.take() {
        let _ = child.kill();
        let _ = child.wait();
    }
}

impl AudioOutput for WavFileAudioOutput {
    fn start(&self, key: &AudioKey, clip: &AudioRef) -> Result<(), AudioOutputError> {
        let mut active = self.active();
        if let Some(previous) = active.take() {
            warn!(clip = %previous.key, "Starting a clip while another is active");
            halt(previous);
        }

        let path = self.write_clip(key, clip)?;
        let player = self.spawn_player(&path)?;
        debug!(clip = %key, path = %path.display(), playing = player.is_some(), "Clip written");

        *active = Some(ActiveClip {
            key: key.clone(),
            player,
        });
        Ok(())
    }

    fn stop(&self, key: &AudioKey) {
        let mut active = self.active();
        if active.as_ref().is_some_and(|clip| &clip.key == key)
            && let Some(clip) = active.take()
        {
            halt(clip);
        }
    }

    fn is_playing(&self, key: &AudioKey) -> bool {
        let mut active = self.active();
        match active.as_mut() {
            Some(ActiveClip {
                key: active_key,
                player: Some(child),
            }) if active_key == key => matches!(child.try_wait(), Ok(None)),
            _ => false,
        }
    }
}

impl Drop for WavFileAudioOutput {
    fn drop(&mut self) {
        if let Some(clip) = self.active().take() {
            halt(clip);
        }
    }
}
