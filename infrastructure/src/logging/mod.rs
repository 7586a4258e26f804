//! Logging infrastructure: structured flow transcripts.
//!
//! Provides [`JsonlFlowLogger`], a JSONL file writer that implements the
//! [`ConversationLogger`](clarity_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlFlowLogger;
