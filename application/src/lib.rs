//! Application layer for legal-clarity
//!
//! This crate contains the flow invocation layer, session orchestration,
//! port definitions and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod flow;
pub mod ports;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::SessionConfig;
pub use flow::{FlowError, FlowErrorKind, FlowExecutor, FlowRegistry, LegalFlows, RegistryError};
pub use ports::{
    audio_output::{AudioOutput, AudioOutputError, SilentAudioOutput},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_gateway::{GatewayError, GenerativeModel, ModelReply, ModelRequest, OutputConstraint},
    progress::{FlowProgressNotifier, NoFlowProgress},
};
pub use session::{
    FailureNotice, InitialAnalysis, Panel, PlayOutcome, RequestKey, RequestStatus, SessionError,
    SessionOrchestrator,
};
