//! Q&A conversation state machine
//!
//! `idle → awaiting-answer → idle`. Submitting a question appends the user
//! turn straight away; the answer either appends an assistant turn or the
//! question is rolled back and the transcript is as it was before.

use crate::audio::AudioRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioRef>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            audio: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            audio: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Idle,
    AwaitingAnswer,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("a question is already awaiting an answer")]
    AwaitingAnswer,

    #[error("question is empty")]
    EmptyQuestion,

    #[error("no question is awaiting an answer")]
    NotAwaiting,

    #[error("no conversation turn at index {0}")]
    TurnNotFound(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
    /// Index of the user turn awaiting its answer
    pending: Option<usize>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConversationState {
        if self.pending.is_some() {
            ConversationState::AwaitingAnswer
        } else {
            ConversationState::Idle
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn turn(&self, index: usize) -> Option<&ConversationTurn> {
        self.turns.get(index)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a user question. Returns the index of the new turn.
    pub fn submit(&mut self, question: &str) -> Result<usize, ConversationError> {
        if self.pending.is_some() {
            return Err(ConversationError::AwaitingAnswer);
        }
        if question.trim().is_empty() {
            return Err(ConversationError::EmptyQuestion);
        }
        self.turns.push(ConversationTurn::user(question));
        let index = self.turns.len() - 1;
        self.pending = Some(index);
        Ok(index)
    }

    /// Append the answer to the pending question. Returns the index of the
    /// assistant turn.
    pub fn resolve(&mut self, answer: impl Into<String>) -> Result<usize, ConversationError> {
        self.pending.take().ok_or(ConversationError::NotAwaiting)?;
        self.turns.push(ConversationTurn::assistant(answer));
        Ok(self.turns.len() - 1)
    }

    /// Remove the pending question. Returns the removed turn.
    pub fn roll_back(&mut self) -> Option<ConversationTurn> {
        let index = self.pending.take()?;
        if index < self.turns.len() {
            Some(self.turns.remove(index))
        } else {
            None
        }
    }

    pub fn attach_audio(&mut self, index: usize, audio: AudioRef) -> Result<(), ConversationError> {
        let turn = self
            .turns
            .get_mut(index)
            .ok_or(ConversationError::TurnNotFound(index))?;
        turn.audio = Some(audio);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_then_resolve() {
        let mut c = Conversation::new();
        assert_eq!(c.submit("When is rent due?").unwrap(), 0);
        assert_eq!(c.state(), ConversationState::AwaitingAnswer);
        assert_eq!(c.resolve("On or before the 5th.").unwrap(), 1);
        assert_eq!(c.state(), ConversationState::Idle);
        assert_eq!(c.turns()[0].role, Role::User);
        assert_eq!(c.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn test_roll_back_restores_previous_transcript() {
        let mut c = Conversation::new();
        c.submit("q1").unwrap();
        c.resolve("a1").unwrap();
        let before = c.turns().to_vec();

        c.submit("q2").unwrap();
        let removed = c.roll_back().unwrap();
        assert_eq!(removed.text, "q2");
        assert_eq!(c.turns(), before.as_slice());
        assert_eq!(c.state(), ConversationState::Idle);
    }

    #[test]
    fn test_second_submit_rejected_while_awaiting() {
        let mut c = Conversation::new();
        c.submit("q1").unwrap();
        assert_eq!(c.submit("q2").unwrap_err(), ConversationError::AwaitingAnswer);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_blank_question_rejected() {
        let mut c = Conversation::new();
        assert_eq!(c.submit("  ").unwrap_err(), ConversationError::EmptyQuestion);
        assert!(c.is_empty());
    }

    #[test]
    fn test_resolve_without_question() {
        let mut c = Conversation::new();
        assert_eq!(c.resolve("a").unwrap_err(), ConversationError::NotAwaiting);
        assert!(c.roll_back().is_none());
    }

    #[test]
    fn test_attach_audio() {
        let mut c = Conversation::new();
        c.submit("q").unwrap();
        c.resolve("a").unwrap();
        c.attach_audio(1, AudioRef::new("data:audio/wav;base64,AA")).unwrap();
        assert!(c.turn(1).unwrap().audio.is_some());
        assert_eq!(
            c.attach_audio(5, AudioRef::new("x")).unwrap_err(),
            ConversationError::TurnNotFound(5)
        );
    }
}
