//! Gemini implementation of the GenerativeModel port

use super::error::GeminiError;
use super::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, SpeechConfig,
    api_error_message, to_response_schema,
};
use crate::audio::{pcm_sample_rate, pcm_to_wav_data_uri, wav_data_uri};
use crate::config::FileModelConfig;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use clarity_application::ports::model_gateway::{
    GatewayError, GenerativeModel, ModelReply, ModelRequest, OutputConstraint,
};
use clarity_domain::util::preview;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_VOICE: &str = "Algenib";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Gateway to the Gemini `generateContent` API
#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    speech_model: String,
    voice: String,
    temperature: Option<f32>,
}

impl GeminiGateway {
    pub fn new(api_key: impl Into<String>) -> Result<Self, GeminiError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, GeminiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            temperature: None,
        })
    }

    /// Build a gateway from the `[model]` config section, reading the API key
    /// from the configured environment variable
    pub fn from_config(config: &FileModelConfig) -> Result<Self, GeminiError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| GeminiError::MissingApiKey(config.api_key_env.clone()))?;

        let mut gateway = Self::with_timeout(api_key, Duration::from_secs(config.timeout_seconds))?
            .with_models(&config.text_model, &config.speech_model)
            .with_voice(&config.voice);
        if let Some(url) = &config.base_url {
            gateway = gateway.with_base_url(url);
        }
        if let Some(t) = config.temperature {
            gateway = gateway.with_temperature(t);
        }
        Ok(gateway)
    }

    pub fn with_models(mut self, text_model: impl Into<String>, speech_model: impl Into<String>) -> Self {
        self.text_model = text_model.into();
        self.speech_model = speech_model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Temperature for requests whose capability does not set one
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Model name and body for one request
    fn build_request(&self, request: &ModelRequest) -> (&str, GenerateContentRequest) {
        let (model, generation_config) = match &request.output {
            OutputConstraint::Structured(schema) => (
                self.text_model.as_str(),
                GenerationConfig {
                    temperature: request.temperature.or(self.temperature),
                    response_mime_type: Some("application/json".to_string()),
                    response_schema: Some(to_response_schema(schema)),
                    ..Default::default()
                },
            ),
            OutputConstraint::Speech => (
                self.speech_model.as_str(),
                GenerationConfig {
                    response_modalities: vec!["AUDIO".to_string()],
                    speech_config: Some(SpeechConfig::prebuilt(&self.voice)),
                    ..Default::default()
                },
            ),
        };

        (
            model,
            GenerateContentRequest {
                contents: vec![Content::user(&request.prompt)],
                generation_config,
            },
        )
    }

    async fn send(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        Ok(response.json().await?)
    }
}

/// Interpret a response according to what the request asked for
fn parse_reply(
    output: &OutputConstraint,
    response: GenerateContentResponse,
) -> Result<ModelReply, GeminiError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GeminiError::EmptyResponse(format!("prompt blocked: {reason}")));
    }

    let candidate = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .ok_or_else(|| GeminiError::EmptyResponse("no candidates".to_string()))?;
    let finish_reason = candidate.finish_reason.unwrap_or_default();
    let parts = candidate
        .content
        .map(|content| content.parts)
        .filter(|parts| !parts.is_empty())
        .ok_or_else(|| GeminiError::EmptyResponse(format!("no content (finish reason {finish_reason})")))?;

    match output {
        OutputConstraint::Structured(_) => {
            let text: String = parts.into_iter().filter_map(|part| part.text).collect();
            let json = strip_code_fence(&text);
            serde_json::from_str::<Value>(json)
                .map(ModelReply::Structured)
                .map_err(|e| GeminiError::ParseError {
                    error: e.to_string(),
                    raw: preview(&text, 200),
                })
        }
        OutputConstraint::Speech => {
            let inline = parts
                .into_iter()
                .find_map(|part| part.inline_data)
                .ok_or_else(|| GeminiError::EmptyResponse("no audio in response".to_string()))?;
            let bytes = BASE64_STANDARD
                .decode(inline.data.as_bytes())
                .map_err(crate::audio::AudioEncodingError::from)?;

            let clip = if inline.mime_type.starts_with("audio/wav") {
                wav_data_uri(&bytes)
            } else {
                pcm_to_wav_data_uri(&bytes, pcm_sample_rate(&inline.mime_type))?
            };
            Ok(ModelReply::Speech(clip))
        }
    }
}

/// JSON mode occasionally still wraps output in a markdown fence
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[async_trait]
impl GenerativeModel for GeminiGateway {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, GatewayError> {
        let (model, body) = self.build_request(request);
        debug!(capability = %request.capability, model, "Calling Gemini");

        let response = self.send(model, &body).await.map_err(|e| {
            warn!(capability = %request.capability, "Gemini request failed: {}", e);
            GatewayError::from(e)
        })?;

        parse_reply(&request.output, response).map_err(|e| {
            warn!(capability = %request.capability, "Unusable Gemini response: {}", e);
            GatewayError::from(e)
        })
    }
}
