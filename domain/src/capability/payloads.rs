//! Typed payload records
//!
//! One input and one output record per capability. Field names serialize in
//! camelCase, matching the schema field names in the catalogue, so a record
//! serialized with `serde_json::to_value` validates against its schema and a
//! validated payload deserializes back into the record.

use super::language::Language;
use super::name::CapabilityName;
use crate::audio::AudioRef;
use crate::risk::Severity;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Binds a capability name to its input and output records
pub trait Capability {
    const NAME: CapabilityName;
    type Input: Serialize + Send + Sync;
    type Output: DeserializeOwned + Send;
}

// ==================== summarize ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeInput {
    pub document_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeOutput {
    pub summary: String,
}

pub struct Summarize;

impl Capability for Summarize {
    const NAME: CapabilityName = CapabilityName::Summarize;
    type Input = SummarizeInput;
    type Output = SummarizeOutput;
}

// ==================== detect-risks ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRisksInput {
    pub document_text: String,
}

/// One risk as reported by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedRisk {
    pub description: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectRisksOutput {
    pub risks: Vec<DetectedRisk>,
}

pub struct DetectRisks;

impl Capability for DetectRisks {
    const NAME: CapabilityName = CapabilityName::DetectRisks;
    type Input = DetectRisksInput;
    type Output = DetectRisksOutput;
}

// ==================== extract-obligations ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractObligationsInput {
    pub document_text: String,
    pub user_party: String,
    pub other_party: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractObligationsOutput {
    pub user_obligations: Vec<String>,
    pub other_party_obligations: Vec<String>,
}

pub struct ExtractObligations;

impl Capability for ExtractObligations {
    const NAME: CapabilityName = CapabilityName::ExtractObligations;
    type Input = ExtractObligationsInput;
    type Output = ExtractObligationsOutput;
}

// ==================== answer-question ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerQuestionInput {
    pub document_text: String,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerQuestionOutput {
    pub answer: String,
}

pub struct AnswerQuestion;

impl Capability for AnswerQuestion {
    const NAME: CapabilityName = CapabilityName::AnswerQuestion;
    type Input = AnswerQuestionInput;
    type Output = AnswerQuestionOutput;
}

// ==================== suggest-negotiation ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestNegotiationInput {
    pub risk_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestNegotiationOutput {
    pub suggestion: String,
}

pub struct SuggestNegotiation;

impl Capability for SuggestNegotiation {
    const NAME: CapabilityName = CapabilityName::SuggestNegotiation;
    type Input = SuggestNegotiationInput;
    type Output = SuggestNegotiationOutput;
}

// ==================== translate ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateInput {
    pub text: String,
    pub target_language: Language,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateOutput {
    pub translated_text: String,
}

pub struct Translate;

impl Capability for Translate {
    const NAME: CapabilityName = CapabilityName::Translate;
    type Input = TranslateInput;
    type Output = TranslateOutput;
}

// ==================== synthesize-speech ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizeSpeechInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeSpeechOutput {
    pub audio_ref: AudioRef,
}

pub struct SynthesizeSpeech;

impl Capability for SynthesizeSpeech {
    const NAME: CapabilityName = CapabilityName::SynthesizeSpeech;
    type Input = SynthesizeSpeechInput;
    type Output = SynthesizeSpeechOutput;
}

// ==================== draft-contract ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftContractInput {
    pub client_name: String,
    pub freelancer_name: String,
    pub project_scope: String,
    pub payment_amount: f64,
    pub payment_terms: String,
    pub deadline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftContractOutput {
    pub contract_text: String,
}

pub struct DraftContract;

impl Capability for DraftContract {
    const NAME: CapabilityName = CapabilityName::DraftContract;
    type Input = DraftContractInput;
    type Output = DraftContractOutput;
}
