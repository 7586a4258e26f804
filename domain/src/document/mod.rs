//! The active document and its generation counter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// File name used for the bundled sample
pub const SAMPLE_FILE_NAME: &str = "sample-rental-agreement.txt";

/// A sample Indian residential rental agreement
pub const SAMPLE_DOCUMENT: &str = include_str!("assets/sample-rental-agreement.txt");

/// One loaded document. Replaced, never mutated, when a new one is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSession {
    pub document_text: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

impl DocumentSession {
    pub fn new(document_text: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            file_name: file_name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn sample() -> Self {
        Self::new(SAMPLE_DOCUMENT, SAMPLE_FILE_NAME)
    }

    pub fn char_count(&self) -> usize {
        self.document_text.chars().count()
    }
}

/// Session generation
///
/// Incremented every time the active document changes. Results are tagged
/// with the generation they were issued against and dropped if it no longer
/// matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
