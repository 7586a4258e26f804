//! Flow registry
//!
//! Name → [`CapabilitySpec`] lookup, built once at startup and then shared
//! read-only behind an `Arc`. Every spec is checked as it is registered so
//! configuration defects surface before the first request.

use super::error::{FlowError, RegistryError};
use clarity_domain::{CapabilityName, CapabilitySpec, FieldKind, builtin_specs};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Default)]
pub struct FlowRegistry {
    specs: BTreeMap<CapabilityName, CapabilitySpec>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the eight built-in capabilities.
    ///
    /// Fails if any built-in spec is defective or missing.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for spec in builtin_specs()? {
            registry = registry.register(spec)?;
        }

        let missing: Vec<_> = CapabilityName::ALL
            .into_iter()
            .filter(|name| !registry.specs.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::Incomplete(missing));
        }

        Ok(registry)
    }

    /// Add a spec (builder pattern).
    pub fn register(mut self, spec: CapabilitySpec) -> Result<Self, RegistryError> {
        check_spec(&spec)?;
        if self.specs.contains_key(&spec.name) {
            return Err(RegistryError::Duplicate(spec.name));
        }
        debug!(capability = %spec.name, "Registered capability");
        self.specs.insert(spec.name, spec);
        Ok(self)
    }

    pub fn get(&self, name: CapabilityName) -> Option<&CapabilitySpec> {
        self.specs.get(&name)
    }

    /// Look up a capability by its wire name
    pub fn lookup(&self, name: &str) -> Result<&CapabilitySpec, FlowError> {
        name.parse::<CapabilityName>()
            .ok()
            .and_then(|n| self.specs.get(&n))
            .ok_or_else(|| FlowError::UnknownCapability(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = CapabilityName> + '_ {
        self.specs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn check_spec(spec: &CapabilitySpec) -> Result<(), RegistryError> {
    let prompt = spec
        .prompt
        .as_ref()
        .ok_or(RegistryError::MissingTemplate(spec.name))?;
    if spec.input_schema.is_empty() {
        return Err(RegistryError::MissingSchema {
            capability: spec.name,
            which: "input",
        });
    }
    if spec.output_schema.is_empty() {
        return Err(RegistryError::MissingSchema {
            capability: spec.name,
            which: "output",
        });
    }

    let placeholders = prompt.placeholders();
    let fields: BTreeSet<&str> = spec.input_schema.field_names().collect();
    if placeholders != fields {
        return Err(RegistryError::PlaceholderMismatch {
            capability: spec.name,
            missing: placeholders.difference(&fields).map(|s| s.to_string()).collect(),
            unused: fields.difference(&placeholders).map(|s| s.to_string()).collect(),
        });
    }

    if spec.is_speech() {
        let single_text = spec.output_schema.len() == 1
            && matches!(spec.output_schema.fields()[0].kind, FieldKind::String { .. });
        if !single_text {
            return Err(RegistryError::SpeechOutputShape(spec.name));
        }
    }

    Ok(())
}
