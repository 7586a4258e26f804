//! Analysis report gathered by `analyze`

use clarity_application::SessionError;
use clarity_domain::{ExtractObligationsOutput, Language, RiskItem};
use serde::Serialize;

/// A panel that could not be filled
#[derive(Debug, Clone, Serialize)]
pub struct ReportError {
    pub section: String,
    pub message: String,
    pub retryable: bool,
}

impl ReportError {
    pub fn new(section: impl Into<String>, err: &SessionError) -> Self {
        Self {
            section: section.into(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Obligations {
    pub user_party: String,
    pub other_party: String,
    #[serde(flatten)]
    pub lists: ExtractObligationsOutput,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub file_name: String,
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<(Language, String)>,
    pub risks: Vec<RiskItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obligations: Option<Obligations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ReportError>,
}

impl AnalysisReport {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn record_error(&mut self, section: &str, err: &SessionError) {
        self.errors.push(ReportError::new(section, err));
    }
}
