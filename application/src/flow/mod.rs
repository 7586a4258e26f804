//! Flow invocation layer
//!
//! - [`registry`] - immutable capability lookup, checked at registration
//! - [`executor`] - validate, render, call, validate
//! - [`surface`] - typed one-method-per-capability API

pub mod error;
pub mod executor;
pub mod registry;
pub mod surface;

pub use error::{FlowError, FlowErrorKind, RegistryError};
pub use executor::FlowExecutor;
pub use registry::FlowRegistry;
pub use surface::LegalFlows;
