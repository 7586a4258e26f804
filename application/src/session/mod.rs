//! Session orchestration
//!
//! One active document at a time. [`SessionOrchestrator`] owns every panel
//! derived from it and the single audio channel.

pub mod error;
pub mod flight;
pub mod orchestrator;
pub mod panel;

pub use error::SessionError;
pub use flight::RequestKey;
pub use orchestrator::{InitialAnalysis, PlayOutcome, SessionOrchestrator};
pub use panel::{FailureNotice, Panel, RequestStatus};
