//! Capability specifications

use super::name::CapabilityName;
use crate::prompt::PromptTemplate;
use crate::schema::ObjectSchema;
use serde::{Deserialize, Serialize};

/// How the model is asked to answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// JSON constrained to the output schema
    Structured,
    /// Synthesized audio. The output schema must hold exactly one string
    /// field, which receives the audio reference.
    Speech,
}

/// Per-capability generation parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Everything the executor needs to run one capability
///
/// Specs are assembled once, handed to the registry, and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilitySpec {
    pub name: CapabilityName,
    pub description: String,
    pub input_schema: ObjectSchema,
    pub output_schema: ObjectSchema,
    pub prompt: Option<PromptTemplate>,
    pub output_mode: OutputMode,
    pub params: ModelParams,
}

impl CapabilitySpec {
    pub fn new(name: CapabilityName, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into(),
            input_schema: ObjectSchema::new(),
            output_schema: ObjectSchema::new(),
            prompt: None,
            output_mode: OutputMode::Structured,
            params: ModelParams::default(),
        }
    }

    pub fn with_input(mut self, schema: ObjectSchema) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn with_output(mut self, schema: ObjectSchema) -> Self {
        self.output_schema = schema;
        self
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = Some(temperature);
        self
    }

    pub fn is_speech(&self) -> bool {
        self.output_mode == OutputMode::Speech
    }
}
