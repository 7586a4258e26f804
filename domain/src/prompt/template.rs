//! Prompt templates with named placeholders
//!
//! A template is plain text with `{{name}}` placeholders. The set of
//! placeholder names is parsed once at construction so the registry can check
//! it against the capability's input fields before anything is invoked.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;

/// Template parse or render failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),

    #[error("empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),

    #[error("template is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed prompt template
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template. Whitespace inside braces is ignored (`{{ name }}`).
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut rest = source.as_str();
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or(TemplateError::Unterminated(offset + open))?;
            let name = after[..close].trim();
            if name.is_empty() {
                return Err(TemplateError::EmptyPlaceholder(offset + open));
            }
            segments.push(Segment::Placeholder(name.to_string()));

            let consumed = open + 2 + close + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { source, segments })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct placeholder names, sorted
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Substitute each placeholder with the matching input field.
    ///
    /// Strings are inserted verbatim, numbers in their shortest form
    /// (`25000`, not `25000.0`), lists and objects as compact JSON. Absent
    /// and `null` fields render as the empty string.
    pub fn render(&self, fields: &Map<String, Value>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    if let Some(value) = fields.get(name) {
                        push_value(&mut out, value);
                    }
                }
            }
        }
        out
    }
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => out.push_str(&i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => {
                out.push_str(&format!("{}", f as i64))
            }
            _ => out.push_str(&n.to_string()),
        },
        other => out.push_str(&other.to_string()),
    }
}
