//! Presentation layer for legal-clarity
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::{AnalyzeArgs, Cli, Command, DocumentArgs, DraftArgs, OutputFormat};
pub use cli::document::read_document_file;
pub use output::console::ConsoleFormatter;
pub use output::report::{AnalysisReport, Obligations, ReportError};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
