//! Single-flight bookkeeping
//!
//! At most one request per [`RequestKey`] is in flight. Each entry remembers
//! the generation it was issued against, so a response that arrives after a
//! document change cannot release the entry of a newer request.

use clarity_domain::{AudioKey, Generation, Language};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Summary,
    Risks,
    Obligations,
    /// Negotiation suggestion for the risk at this index
    Suggestion(usize),
    Translation(Language),
    Speech(AudioKey),
    Draft,
}

impl RequestKey {
    /// Whether the request belongs to the active document. Document-bound
    /// entries are dropped when the document changes.
    pub fn is_document_bound(&self) -> bool {
        !matches!(self, RequestKey::Draft)
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKey::Summary => write!(f, "summary"),
            RequestKey::Risks => write!(f, "risk detection"),
            RequestKey::Obligations => write!(f, "obligation extraction"),
            RequestKey::Suggestion(i) => write!(f, "negotiation tip for risk #{}", i + 1),
            RequestKey::Translation(lang) => write!(f, "translation to {}", lang),
            RequestKey::Speech(key) => write!(f, "audio for {}", key),
            RequestKey::Draft => write!(f, "contract draft"),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct InFlight {
    entries: HashMap<RequestKey, Generation>,
}

impl InFlight {
    /// Claim `key`. Returns false if a request for it is already pending.
    pub(crate) fn try_begin(&mut self, key: RequestKey, generation: Generation) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, generation);
        true
    }

    /// Release `key` if it is still held by `generation`
    pub(crate) fn finish(&mut self, key: &RequestKey, generation: Generation) {
        if self.entries.get(key) == Some(&generation) {
            self.entries.remove(key);
        }
    }

    pub(crate) fn contains(&self, key: &RequestKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Forget every document-bound request
    pub(crate) fn drop_document_bound(&mut self) {
        self.entries.retain(|key, _| !key.is_document_bound());
    }
}
