//! Session audio cache

use super::{AudioKey, AudioRef};
use std::collections::HashMap;

/// Synthesized clips for the active document.
///
/// Entries are never evicted while the session lives; the whole cache is
/// dropped when the document changes.
#[derive(Debug, Clone, Default)]
pub struct AudioCache {
    clips: HashMap<AudioKey, AudioRef>,
}

impl AudioCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &AudioKey) -> Option<&AudioRef> {
        self.clips.get(key)
    }

    pub fn contains(&self, key: &AudioKey) -> bool {
        self.clips.contains_key(key)
    }

    pub fn insert(&mut self, key: AudioKey, clip: AudioRef) {
        self.clips.insert(key, clip);
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
