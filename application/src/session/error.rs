//! Session orchestration errors

use super::flight::RequestKey;
use crate::flow::FlowError;
use crate::ports::audio_output::AudioOutputError;
use clarity_domain::{ConversationError, Generation, PlaybackError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("No document loaded")]
    NoDocument,

    #[error("No summary available yet")]
    NoSummary,

    #[error("Already in progress: {0}")]
    RequestInFlight(RequestKey),

    #[error("A question is already awaiting an answer")]
    AwaitingAnswer,

    /// The document changed while the request was in flight; its result was
    /// dropped
    #[error("Result discarded: issued for session {issued}, current session is {current}")]
    StaleGeneration { issued: Generation, current: Generation },

    /// The summary was regenerated while it was being translated; the
    /// translation was dropped
    #[error("Summary changed during translation; result discarded")]
    SummaryChanged,

    #[error("No risk #{}", .0 + 1)]
    RiskNotFound(usize),

    #[error("No answer at conversation turn {0}")]
    TurnNotFound(usize),

    #[error(transparent)]
    Conversation(ConversationError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    AudioOutput(#[from] AudioOutputError),

    #[error(transparent)]
    Flow(#[from] FlowError),
}

impl SessionError {
    /// Whether a retry affordance makes sense for this error
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::Flow(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Whether the result was dropped because what it was computed from is
    /// gone
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            SessionError::StaleGeneration { .. } | SessionError::SummaryChanged
        )
    }
}

impl From<ConversationError> for SessionError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::AwaitingAnswer => SessionError::AwaitingAnswer,
            ConversationError::TurnNotFound(i) => SessionError::TurnNotFound(i),
            other => SessionError::Conversation(other),
        }
    }
}
