//! Domain layer for legal-clarity
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Capabilities
//!
//! Every model-backed feature (summary, risk detection, translation, speech,
//! ...) is a **capability**: a name, an input schema, an output schema and a
//! prompt template. Schemas are plain data so a single routine validates
//! every payload in both directions.
//!
//! ## Session state
//!
//! - **Generation**: bumped on every document change; stale results are dropped
//! - **Conversation**: Q&A transcript with optimistic append and rollback
//! - **Playback**: at most one clip loading or playing at a time

pub mod audio;
pub mod capability;
pub mod conversation;
pub mod document;
pub mod prompt;
pub mod risk;
pub mod schema;
pub mod util;

// Re-export commonly used types
pub use audio::{AudioCache, AudioKey, AudioRef, ClipState, PlayDecision, PlaybackError, PlaybackMachine};
pub use capability::{
    Capability, CapabilityName, CapabilitySpec, Language, ModelParams, OutputMode, builtin_specs,
};
pub use capability::{
    AnswerQuestion, AnswerQuestionInput, AnswerQuestionOutput, DetectRisks, DetectRisksInput,
    DetectRisksOutput, DetectedRisk, DraftContract, DraftContractInput, DraftContractOutput,
    ExtractObligations, ExtractObligationsInput, ExtractObligationsOutput, SuggestNegotiation,
    SuggestNegotiationInput, SuggestNegotiationOutput, Summarize, SummarizeInput, SummarizeOutput,
    SynthesizeSpeech, SynthesizeSpeechInput, SynthesizeSpeechOutput, Translate, TranslateInput,
    TranslateOutput,
};
pub use conversation::{Conversation, ConversationError, ConversationState, ConversationTurn, Role};
pub use document::{DocumentSession, Generation};
pub use prompt::{PromptTemplate, TemplateError};
pub use risk::{RiskItem, Severity};
pub use schema::{FieldKind, FieldSchema, ObjectSchema, SchemaViolation, validate};
