//! `generateContent` request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    pub role: String,
    pub parts: Vec<TextPart>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![TextPart { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TextPart {
    pub text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

impl SpeechConfig {
    pub fn prebuilt(voice_name: impl Into<String>) -> Self {
        Self {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: voice_name.into(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<ContentResponse>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartResponse {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Deserialize)]
pub(crate) struct ErrorWrapper {
    pub error: ErrorBody,
}

#[derive(Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub status: Option<String>,
}

/// Human-readable message from an error body, falling back to the raw text
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status.filter(|s| !s.is_empty()) {
                Some(status) => format!("{status}: {msg}"),
                None => msg,
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

/// Convert a JSON Schema object into Gemini's `responseSchema` dialect.
///
/// Gemini takes upper-case type names and a subset of keywords;
/// `minLength`, `exclusiveMinimum` and `additionalProperties` are dropped
/// and enforced by output validation instead.
pub(crate) fn to_response_schema(schema: &Value) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (key, value) in map {
        match key.as_str() {
            "type" => {
                if let Some(name) = value.as_str() {
                    out.insert(key.clone(), Value::String(name.to_uppercase()));
                }
            }
            "properties" => {
                if let Value::Object(props) = value {
                    let converted = props
                        .iter()
                        .map(|(name, prop)| (name.clone(), to_response_schema(prop)))
                        .collect();
                    out.insert(key.clone(), Value::Object(converted));
                }
            }
            "items" => {
                out.insert(key.clone(), to_response_schema(value));
            }
            "required" | "enum" | "description" => {
                out.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_schema_conversion() {
        let schema = json!({
            "type": "object",
            "properties": {
                "risks": {
                    "type": "array",
                    "description": "Risks found",
                    "items": {
                        "type": "object",
                        "properties": {
                            "description": {"type": "string", "minLength": 1},
                            "severity": {"type": "string", "enum": ["High", "Medium", "Low"]}
                        },
                        "required": ["description", "severity"],
                        "additionalProperties": false
                    }
                },
                "amount": {"type": "number", "exclusiveMinimum": 0}
            },
            "required": ["risks"]
        });

        let converted = to_response_schema(&schema);
        assert_eq!(converted["type"], "OBJECT");
        let item = &converted["properties"]["risks"]["items"];
        assert_eq!(item["type"], "OBJECT");
        assert_eq!(item["properties"]["severity"]["enum"][0], "High");
        assert!(item["properties"]["description"].get("minLength").is_none());
        assert!(item.get("additionalProperties").is_none());
        assert_eq!(converted["properties"]["amount"], json!({"type": "NUMBER"}));
        assert_eq!(converted["properties"]["risks"]["description"], "Risks found");
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(api_error_message(body), "RESOURCE_EXHAUSTED: Quota exceeded");
        assert_eq!(api_error_message("<html>bad gateway</html>"), "<html>bad gateway</html>");
    }

    #[test]
    fn test_speech_config_shape() {
        let config = GenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: Some(SpeechConfig::prebuilt("Algenib")),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({
                "responseModalities": ["AUDIO"],
                "speechConfig": {"voiceConfig": {"prebuiltVoiceConfig": {"voiceName": "Algenib"}}}
            })
        );
    }
}
