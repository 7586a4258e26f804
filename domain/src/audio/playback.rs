//! Playback state machine
//!
//! ```text
//! stopped ──request(cached)──▶ playing ──stop / ended──▶ stopped
//!    │                           ▲
//!    └──request(uncached)──▶ loading ──failed──▶ stopped
//! ```
//!
//! Only one clip is ever loading or playing. Requesting the clip that is
//! currently playing toggles it off.

use super::AudioKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("audio for {0} is still loading")]
    Busy(AudioKey),
}

/// Per-clip view of the machine, for rendering play/stop/spinner controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipState {
    Stopped,
    Loading,
    Playing,
}

/// What the caller must do after a play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayDecision {
    /// The requested clip was playing and must be stopped
    Stop(AudioKey),
    /// The clip is cached: stop `previous` (if any) and start it
    Start { previous: Option<AudioKey> },
    /// The clip must be synthesized: stop `previous` (if any), then load
    Load { previous: Option<AudioKey> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum State {
    #[default]
    Stopped,
    Loading(AudioKey),
    Playing(AudioKey),
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackMachine {
    state: State,
}

impl PlaybackMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a play request for `key`.
    pub fn request(&mut self, key: &AudioKey, cached: bool) -> Result<PlayDecision, PlaybackError> {
        let previous = match &self.state {
            State::Loading(loading) => return Err(PlaybackError::Busy(loading.clone())),
            State::Playing(playing) if playing == key => {
                self.state = State::Stopped;
                return Ok(PlayDecision::Stop(key.clone()));
            }
            State::Playing(playing) => Some(playing.clone()),
            State::Stopped => None,
        };

        if cached {
            self.state = State::Playing(key.clone());
            Ok(PlayDecision::Start { previous })
        } else {
            self.state = State::Loading(key.clone());
            Ok(PlayDecision::Load { previous })
        }
    }

    /// Synthesis for `key` finished. Returns false when the load was
    /// abandoned in the meantime and the clip must not be started.
    pub fn loaded(&mut self, key: &AudioKey) -> bool {
        if self.state == State::Loading(key.clone()) {
            self.state = State::Playing(key.clone());
            true
        } else {
            false
        }
    }

    /// Loading or starting `key` failed
    pub fn failed(&mut self, key: &AudioKey) {
        match &self.state {
            State::Loading(k) | State::Playing(k) if k == key => self.state = State::Stopped,
            _ => {}
        }
    }

    /// Stop whatever is active. Returns the clip that was playing.
    pub fn stop(&mut self) -> Option<AudioKey> {
        match std::mem::take(&mut self.state) {
            State::Playing(key) => Some(key),
            State::Loading(_) | State::Stopped => None,
        }
    }

    /// `key` reached its natural end
    pub fn ended(&mut self, key: &AudioKey) -> bool {
        if self.state == State::Playing(key.clone()) {
            self.state = State::Stopped;
            true
        } else {
            false
        }
    }

    pub fn playing(&self) -> Option<&AudioKey> {
        match &self.state {
            State::Playing(key) => Some(key),
            _ => None,
        }
    }

    pub fn clip_state(&self, key: &AudioKey) -> ClipState {
        match &self.state {
            State::Loading(k) if k == key => ClipState::Loading,
            State::Playing(k) if k == key => ClipState::Playing,
            _ => ClipState::Stopped,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.state == State::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Language;

    fn summary() -> AudioKey {
        AudioKey::text("summary", Language::En)
    }

    #[test]
    fn test_uncached_goes_through_loading() {
        let mut m = PlaybackMachine::new();
        let key = summary();
        assert_eq!(m.request(&key, false).unwrap(), PlayDecision::Load { previous: None });
        assert_eq!(m.clip_state(&key), ClipState::Loading);
        assert!(m.loaded(&key));
        assert_eq!(m.clip_state(&key), ClipState::Playing);
        assert!(m.ended(&key));
        assert!(m.is_stopped());
    }

    #[test]
    fn test_cached_starts_immediately() {
        let mut m = PlaybackMachine::new();
        let key = summary();
        assert_eq!(m.request(&key, true).unwrap(), PlayDecision::Start { previous: None });
        assert_eq!(m.playing(), Some(&key));
    }

    #[test]
    fn test_starting_another_clip_reports_previous() {
        let mut m = PlaybackMachine::new();
        let a = AudioKey::Turn(1);
        let b = AudioKey::Turn(3);
        m.request(&a, true).unwrap();
        assert_eq!(
            m.request(&b, true).unwrap(),
            PlayDecision::Start {
                previous: Some(a.clone())
            }
        );
        assert_eq!(m.clip_state(&a), ClipState::Stopped);
        assert_eq!(m.clip_state(&b), ClipState::Playing);
    }

    #[test]
    fn test_request_on_playing_clip_toggles_off() {
        let mut m = PlaybackMachine::new();
        let key = summary();
        m.request(&key, true).unwrap();
        assert_eq!(m.request(&key, true).unwrap(), PlayDecision::Stop(key.clone()));
        assert!(m.is_stopped());
    }

    #[test]
    fn test_busy_while_loading() {
        let mut m = PlaybackMachine::new();
        let a = summary();
        m.request(&a, false).unwrap();
        assert_eq!(
            m.request(&AudioKey::Turn(1), true).unwrap_err(),
            PlaybackError::Busy(a)
        );
    }

    #[test]
    fn test_failed_load_returns_to_stopped() {
        let mut m = PlaybackMachine::new();
        let key = summary();
        m.request(&key, false).unwrap();
        m.failed(&key);
        assert!(m.is_stopped());
        assert!(!m.loaded(&key));
    }

    #[test]
    fn test_stop_abandons_load() {
        let mut m = PlaybackMachine::new();
        let key = summary();
        m.request(&key, false).unwrap();
        assert_eq!(m.stop(), None);
        assert!(!m.loaded(&key));
        assert!(m.is_stopped());
    }

    #[test]
    fn test_ended_for_other_clip_is_ignored() {
        let mut m = PlaybackMachine::new();
        m.request(&AudioKey::Turn(1), true).unwrap();
        assert!(!m.ended(&AudioKey::Turn(3)));
        assert_eq!(m.playing(), Some(&AudioKey::Turn(1)));
    }
}
