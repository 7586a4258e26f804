//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod audio_output;
pub mod conversation_logger;
pub mod model_gateway;
pub mod progress;
