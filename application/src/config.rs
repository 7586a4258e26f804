//! Application-level configuration.
//!
//! Settings that shape how the session orchestrator behaves, independent of
//! where they were loaded from.

/// Default parties used for obligation extraction.
///
/// The reader is assumed to be `user_party`; `other_party` is the
/// counterparty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub user_party: String,
    pub other_party: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_party: "TENANT".to_string(),
            other_party: "LANDLORD".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn with_parties(user_party: impl Into<String>, other_party: impl Into<String>) -> Self {
        Self {
            user_party: user_party.into(),
            other_party: other_party.into(),
        }
    }
}
