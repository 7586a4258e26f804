//! Risk items shown in the risk panel

use crate::capability::DetectedRisk;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a detected risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown severity: {}", s))
    }
}

/// A risk plus its lazily fetched negotiation suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItem {
    pub description: String,
    pub severity: Severity,
    /// Set at most once per item
    pub suggestion: Option<String>,
    pub suggestion_loading: bool,
}

impl RiskItem {
    pub fn new(description: impl Into<String>, severity: Severity) -> Self {
        Self {
            description: description.into(),
            severity,
            suggestion: None,
            suggestion_loading: false,
        }
    }

    pub fn has_suggestion(&self) -> bool {
        self.suggestion.is_some()
    }
}

impl From<DetectedRisk> for RiskItem {
    fn from(risk: DetectedRisk) -> Self {
        RiskItem::new(risk.description, risk.severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_detected_risk() {
        let item = RiskItem::from(DetectedRisk {
            description: "Deposit deductions are not itemised".to_string(),
            severity: Severity::High,
        });
        assert_eq!(item.severity, Severity::High);
        assert!(!item.has_suggestion());
        assert!(!item.suggestion_loading);
    }

    #[test]
    fn test_severity_ordering_puts_high_first() {
        let mut v = vec![Severity::Low, Severity::High, Severity::Medium];
        v.sort();
        assert_eq!(v, vec![Severity::High, Severity::Medium, Severity::Low]);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("medium".parse::<Severity>().unwrap(), Severity::Medium);
        assert!("Critical".parse::<Severity>().is_err());
    }
}
