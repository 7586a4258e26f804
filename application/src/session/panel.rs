//! Per-panel request lifecycle
//!
//! `idle → pending → succeeded | failed`. A failure keeps the last good
//! value so the panel can show it next to the error and a retry control.

use crate::flow::{FlowError, FlowErrorKind};
use serde::Serialize;

/// What a failed request reports to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureNotice {
    pub kind: FlowErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl From<&FlowError> for FailureNotice {
    fn from(err: &FlowError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(FailureNotice),
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }

    pub fn failure(&self) -> Option<&FailureNotice> {
        match self {
            RequestStatus::Failed(notice) => Some(notice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel<T> {
    value: Option<T>,
    status: RequestStatus,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            value: None,
            status: RequestStatus::Idle,
        }
    }
}

impl<T> Panel<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub(crate) fn begin(&mut self) {
        self.status = RequestStatus::Pending;
    }

    pub(crate) fn succeed(&mut self, value: T) {
        self.value = Some(value);
        self.status = RequestStatus::Succeeded;
    }

    pub(crate) fn fail(&mut self, err: &FlowError) {
        self.status = RequestStatus::Failed(FailureNotice::from(err));
    }

    pub(crate) fn clear(&mut self) {
        self.value = None;
        self.status = RequestStatus::Idle;
    }
}
