//! Interactive chat module
//!
//! Provides a readline-based question-and-answer interface over the active
//! document.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ChatRepl;
