//! Capabilities
//!
//! A capability is one named unit of model-backed work (summarize, translate,
//! ...). This module holds its identity, its typed payload records and the
//! built-in catalogue of specs.

pub mod catalog;
pub mod language;
pub mod name;
pub mod payloads;
pub mod spec;

pub use catalog::builtin_specs;
pub use language::Language;
pub use name::{CapabilityName, UnknownCapabilityName};
pub use payloads::*;
pub use spec::{CapabilitySpec, ModelParams, OutputMode};
