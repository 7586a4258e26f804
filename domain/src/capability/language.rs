//! Summary languages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages a summary can be shown in.
///
/// `En` is the language of the original summary and is never sent to the
/// translate capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    Hindi,
    Tamil,
    Telugu,
    Kannada,
    Bengali,
    Marathi,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Hindi,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
        Language::Bengali,
        Language::Marathi,
    ];

    /// Wire value used in payloads and cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
            Language::Bengali => "Bengali",
            Language::Marathi => "Marathi",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            other => other.as_str(),
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self, Language::En)
    }

    /// Languages accepted by the translate capability
    pub fn translation_targets() -> impl Iterator<Item = Language> {
        Language::ALL.into_iter().filter(|l| !l.is_original())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts the wire value or the display name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Language::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s) || l.display_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = Language::ALL.iter().map(|l| l.as_str()).collect();
                format!("unknown language '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}
