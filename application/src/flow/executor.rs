//! Flow executor
//!
//! Runs one capability end to end:
//!
//! 1. Validate the input against the input schema ([`FlowError::InvalidInput`],
//!    no model call)
//! 2. Render the prompt template with the input fields
//! 3. Call the model once, asking for schema-constrained JSON or speech
//! 4. Validate the answer against the output schema
//!    ([`FlowError::ModelOutputInvalid`])
//!
//! Transport failures map to [`FlowError::ModelUnavailable`]. Nothing is
//! retried here; retry is the caller's decision.

use super::error::FlowError;
use super::registry::FlowRegistry;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::model_gateway::{GenerativeModel, ModelReply, ModelRequest, OutputConstraint};
use crate::ports::progress::{FlowProgressNotifier, NoFlowProgress};
use clarity_domain::util::preview;
use clarity_domain::{Capability, CapabilityName, CapabilitySpec, validate};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct FlowExecutor {
    registry: Arc<FlowRegistry>,
    model: Arc<dyn GenerativeModel>,
    conversation_logger: Arc<dyn ConversationLogger>,
    progress: Arc<dyn FlowProgressNotifier>,
}

impl FlowExecutor {
    pub fn new(registry: Arc<FlowRegistry>, model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            registry,
            model,
            conversation_logger: Arc::new(NoConversationLogger),
            progress: Arc::new(NoFlowProgress),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Create with a progress notifier.
    pub fn with_progress(mut self, progress: Arc<dyn FlowProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    /// Invoke a capability with an untyped payload
    pub async fn invoke(&self, name: CapabilityName, input: &Value) -> Result<Value, FlowError> {
        let spec = self
            .registry
            .get(name)
            .ok_or_else(|| FlowError::UnknownCapability(name.to_string()))?;
        self.execute(spec, input).await
    }

    /// Invoke a capability with its typed input and output records
    pub async fn run<C: Capability>(&self, input: &C::Input) -> Result<C::Output, FlowError> {
        let payload = serde_json::to_value(input).map_err(|e| {
            FlowError::Configuration(format!("cannot serialize {} input: {}", C::NAME, e))
        })?;
        let output = self.invoke(C::NAME, &payload).await?;
        serde_json::from_value(output).map_err(|e| FlowError::ModelOutputInvalid {
            capability: C::NAME,
            reason: e.to_string(),
        })
    }

    async fn execute(&self, spec: &CapabilitySpec, input: &Value) -> Result<Value, FlowError> {
        let capability = spec.name;

        if let Err(violation) = validate(&spec.input_schema, input) {
            debug!(capability = %capability, "Rejected input: {}", violation);
            let err = FlowError::InvalidInput {
                capability,
                violation,
            };
            self.log_failure(capability, &err);
            return Err(err);
        }

        let prompt = spec
            .prompt
            .as_ref()
            .ok_or_else(|| FlowError::Configuration(format!("{} has no prompt template", capability)))?;
        let empty = Map::new();
        let fields = input.as_object().unwrap_or(&empty);
        let rendered = prompt.render(fields);

        let request = ModelRequest {
            capability,
            prompt: rendered,
            output: if spec.is_speech() {
                OutputConstraint::Speech
            } else {
                OutputConstraint::Structured(spec.output_schema.to_json_schema())
            },
            temperature: spec.params.temperature,
        };

        info!(capability = %capability, "Invoking flow");
        self.conversation_logger.log(ConversationEvent::new(
            "flow_invoked",
            json!({
                "capability": capability.as_str(),
                "prompt_chars": request.prompt.chars().count(),
                "prompt_preview": preview(&request.prompt, 200),
            }),
        ));

        self.progress.on_flow_start(capability);
        let result = self.call_model(spec, &request).await;
        self.progress.on_flow_complete(capability, result.is_ok());

        match &result {
            Ok(output) => {
                debug!(capability = %capability, "Flow succeeded");
                self.conversation_logger.log(ConversationEvent::new(
                    "flow_succeeded",
                    json!({
                        "capability": capability.as_str(),
                        "output_preview": preview(&output.to_string(), 200),
                    }),
                ));
            }
            Err(err) => {
                warn!(capability = %capability, kind = %err.kind(), "Flow failed: {}", err);
                self.log_failure(capability, err);
            }
        }

        result
    }

    async fn call_model(&self, spec: &CapabilitySpec, request: &ModelRequest) -> Result<Value, FlowError> {
        let capability = spec.name;
        let reply = self.model.generate(request).await.map_err(|e| {
            if e.is_malformed() {
                FlowError::ModelOutputInvalid {
                    capability,
                    reason: e.to_string(),
                }
            } else {
                FlowError::ModelUnavailable {
                    capability,
                    reason: e.to_string(),
                }
            }
        })?;

        let output = match (reply, spec.is_speech()) {
            (ModelReply::Structured(value), false) => value,
            (ModelReply::Speech(audio), true) => {
                // registration guarantees exactly one text field
                let field = spec
                    .output_schema
                    .field_names()
                    .next()
                    .ok_or_else(|| FlowError::Configuration(format!("{} has no output field", capability)))?;
                let mut map = Map::new();
                map.insert(field.to_string(), Value::String(audio.as_str().to_string()));
                Value::Object(map)
            }
            (ModelReply::Structured(_), true) => {
                return Err(FlowError::ModelOutputInvalid {
                    capability,
                    reason: "expected audio, got structured output".to_string(),
                });
            }
            (ModelReply::Speech(_), false) => {
                return Err(FlowError::ModelOutputInvalid {
                    capability,
                    reason: "expected structured output, got audio".to_string(),
                });
            }
        };

        validate(&spec.output_schema, &output).map_err(|violation| FlowError::ModelOutputInvalid {
            capability,
            reason: violation.to_string(),
        })?;

        Ok(output)
    }

    fn log_failure(&self, capability: CapabilityName, err: &FlowError) {
        self.conversation_logger.log(ConversationEvent::new(
            "flow_failed",
            json!({
                "capability": capability.as_str(),
                "kind": err.kind().as_str(),
                "retryable": err.is_retryable(),
                "message": err.to_string(),
            }),
        ));
    }
}
