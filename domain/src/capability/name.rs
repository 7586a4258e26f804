//! Capability identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of registered capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityName {
    Summarize,
    DetectRisks,
    ExtractObligations,
    AnswerQuestion,
    SuggestNegotiation,
    Translate,
    SynthesizeSpeech,
    DraftContract,
}

impl CapabilityName {
    pub const ALL: [CapabilityName; 8] = [
        CapabilityName::Summarize,
        CapabilityName::DetectRisks,
        CapabilityName::ExtractObligations,
        CapabilityName::AnswerQuestion,
        CapabilityName::SuggestNegotiation,
        CapabilityName::Translate,
        CapabilityName::SynthesizeSpeech,
        CapabilityName::DraftContract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityName::Summarize => "summarize",
            CapabilityName::DetectRisks => "detect-risks",
            CapabilityName::ExtractObligations => "extract-obligations",
            CapabilityName::AnswerQuestion => "answer-question",
            CapabilityName::SuggestNegotiation => "suggest-negotiation",
            CapabilityName::Translate => "translate",
            CapabilityName::SynthesizeSpeech => "synthesize-speech",
            CapabilityName::DraftContract => "draft-contract",
        }
    }

    /// Short human label for progress output
    pub fn label(&self) -> &'static str {
        match self {
            CapabilityName::Summarize => "Summarizing document",
            CapabilityName::DetectRisks => "Detecting risks",
            CapabilityName::ExtractObligations => "Extracting obligations",
            CapabilityName::AnswerQuestion => "Answering question",
            CapabilityName::SuggestNegotiation => "Drafting negotiation tip",
            CapabilityName::Translate => "Translating",
            CapabilityName::SynthesizeSpeech => "Generating audio",
            CapabilityName::DraftContract => "Drafting contract",
        }
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no registered capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCapabilityName(pub String);

impl fmt::Display for UnknownCapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown capability: {}", self.0)
    }
}

impl std::error::Error for UnknownCapabilityName {}

impl FromStr for CapabilityName {
    type Err = UnknownCapabilityName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CapabilityName::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCapabilityName(s.to_string()))
    }
}
