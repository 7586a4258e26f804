//! Typed capability surface
//!
//! One method per capability, taking and returning plain values. This is the
//! API the session orchestrator and the CLI program against.

use super::error::FlowError;
use super::executor::FlowExecutor;
use clarity_domain::{
    AnswerQuestion, AnswerQuestionInput, AudioRef, DetectRisks, DetectRisksInput, DetectedRisk,
    DraftContract, DraftContractInput, ExtractObligations, ExtractObligationsInput,
    ExtractObligationsOutput, Language, SuggestNegotiation, SuggestNegotiationInput, Summarize,
    SummarizeInput, SynthesizeSpeech, SynthesizeSpeechInput, Translate, TranslateInput,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct LegalFlows {
    executor: Arc<FlowExecutor>,
}

impl LegalFlows {
    pub fn new(executor: Arc<FlowExecutor>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &FlowExecutor {
        &self.executor
    }

    pub async fn summarize(&self, document_text: &str) -> Result<String, FlowError> {
        let input = SummarizeInput {
            document_text: document_text.to_string(),
        };
        Ok(self.executor.run::<Summarize>(&input).await?.summary)
    }

    pub async fn detect_risks(&self, document_text: &str) -> Result<Vec<DetectedRisk>, FlowError> {
        let input = DetectRisksInput {
            document_text: document_text.to_string(),
        };
        Ok(self.executor.run::<DetectRisks>(&input).await?.risks)
    }

    pub async fn extract_obligations(
        &self,
        document_text: &str,
        user_party: &str,
        other_party: &str,
    ) -> Result<ExtractObligationsOutput, FlowError> {
        let input = ExtractObligationsInput {
            document_text: document_text.to_string(),
            user_party: user_party.to_string(),
            other_party: other_party.to_string(),
        };
        self.executor.run::<ExtractObligations>(&input).await
    }

    pub async fn answer_question(&self, document_text: &str, question: &str) -> Result<String, FlowError> {
        let input = AnswerQuestionInput {
            document_text: document_text.to_string(),
            question: question.to_string(),
        };
        Ok(self.executor.run::<AnswerQuestion>(&input).await?.answer)
    }

    pub async fn suggest_negotiation(&self, risk_description: &str) -> Result<String, FlowError> {
        let input = SuggestNegotiationInput {
            risk_description: risk_description.to_string(),
        };
        Ok(self.executor.run::<SuggestNegotiation>(&input).await?.suggestion)
    }

    pub async fn translate(&self, text: &str, target_language: Language) -> Result<String, FlowError> {
        let input = TranslateInput {
            text: text.to_string(),
            target_language,
        };
        Ok(self.executor.run::<Translate>(&input).await?.translated_text)
    }

    pub async fn synthesize_speech(&self, text: &str) -> Result<AudioRef, FlowError> {
        let input = SynthesizeSpeechInput {
            text: text.to_string(),
        };
        Ok(self.executor.run::<SynthesizeSpeech>(&input).await?.audio_ref)
    }

    pub async fn draft_contract(&self, input: &DraftContractInput) -> Result<String, FlowError> {
        Ok(self.executor.run::<DraftContract>(input).await?.contract_text)
    }
}
