//! Session orchestrator
//!
//! Sequences capability calls against the single active document and keeps
//! everything derived from it: summary, risks, obligations, conversation,
//! translations and synthesized audio.
//!
//! Every request follows the same shape:
//!
//! 1. Under the state lock: check preconditions, claim the single-flight
//!    key, mark the panel pending, remember the generation
//! 2. Release the lock and await the flow
//! 3. Re-take the lock: release the key, drop the result if the generation
//!    moved on, otherwise apply it
//!
//! The lock is never held across an await.

use super::error::SessionError;
use super::flight::{InFlight, RequestKey};
use super::panel::{Panel, RequestStatus};
use crate::config::SessionConfig;
use crate::flow::LegalFlows;
use crate::ports::audio_output::AudioOutput;
use clarity_domain::{
    AudioCache, AudioKey, AudioRef, ClipState, Conversation, ConversationState, ConversationTurn,
    DocumentSession, DraftContractInput, ExtractObligationsOutput, Generation, Language,
    PlayDecision, PlaybackMachine, RiskItem, Role,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Outcome of a play request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The clip is now playing
    Playing,
    /// The clip was already playing and has been stopped
    Stopped,
    /// Synthesis finished after playback was stopped; the clip was cached
    /// but not started
    Abandoned,
}

/// Results of the eager analysis run when a document is loaded
#[derive(Debug)]
pub struct InitialAnalysis {
    pub summary: Result<String, SessionError>,
    pub risks: Result<Vec<RiskItem>, SessionError>,
}

#[derive(Default)]
struct SessionState {
    generation: Generation,
    document: Option<DocumentSession>,
    summary: Panel<String>,
    risks: Panel<Vec<RiskItem>>,
    obligations: Panel<ExtractObligationsOutput>,
    conversation: Conversation,
    answer_status: RequestStatus,
    translations: HashMap<Language, String>,
    /// Language of the summary currently shown
    summary_language: Language,
    /// Language most recently asked for; a late translation only becomes
    /// visible if it still matches
    requested_language: Language,
    translation_status: RequestStatus,
    audio_cache: AudioCache,
    playback: PlaybackMachine,
    draft: Panel<String>,
    in_flight: InFlight,
}

impl SessionState {
    fn document_text(&self) -> Result<String, SessionError> {
        self.document
            .as_ref()
            .map(|d| d.document_text.clone())
            .ok_or(SessionError::NoDocument)
    }

    fn claim(&mut self, key: RequestKey) -> Result<Generation, SessionError> {
        if self.in_flight.try_begin(key.clone(), self.generation) {
            Ok(self.generation)
        } else {
            Err(SessionError::RequestInFlight(key))
        }
    }

    fn check(&self, issued: Generation) -> Result<(), SessionError> {
        if issued == self.generation {
            Ok(())
        } else {
            Err(SessionError::StaleGeneration {
                issued,
                current: self.generation,
            })
        }
    }

    /// Drop everything derived from the current document and move to a new
    /// generation. Returns the clip that was playing.
    fn invalidate(&mut self) -> Option<AudioKey> {
        let playing = self.playback.stop();
        self.generation = self.generation.next();
        self.document = None;
        self.summary.clear();
        self.risks.clear();
        self.obligations.clear();
        self.conversation.clear();
        self.answer_status = RequestStatus::Idle;
        self.translations.clear();
        self.summary_language = Language::En;
        self.requested_language = Language::En;
        self.translation_status = RequestStatus::Idle;
        self.audio_cache.clear();
        self.in_flight.drop_document_bound();
        playing
    }

    fn displayed_summary(&self) -> Option<(Language, String)> {
        let original = self.summary.value()?;
        let translated = self
            .translations
            .get(&self.summary_language)
            .filter(|_| !self.summary_language.is_original());
        Some(match translated {
            Some(text) => (self.summary_language, text.clone()),
            None => (Language::En, original.clone()),
        })
    }
}

pub struct SessionOrchestrator {
    flows: LegalFlows,
    audio: Arc<dyn AudioOutput>,
    config: SessionConfig,
    state: Mutex<SessionState>,
}

impl SessionOrchestrator {
    pub fn new(flows: LegalFlows, audio: Arc<dyn AudioOutput>) -> Self {
        Self {
            flows,
            audio,
            config: SessionConfig::default(),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ==================== Document lifecycle ====================

    /// Replace the active document. Everything derived from the previous one
    /// is dropped and in-flight results for it will be discarded.
    pub fn start_session(&self, document: DocumentSession) -> Generation {
        let mut s = self.state();
        if let Some(key) = s.invalidate() {
            self.audio.stop(&key);
        }
        info!(
            generation = s.generation.value(),
            file = %document.file_name,
            chars = document.char_count(),
            "Started document session"
        );
        s.document = Some(document);
        s.generation
    }

    /// Start a session and eagerly run summary and risk detection
    pub async fn load_document(&self, document: DocumentSession) -> InitialAnalysis {
        self.start_session(document);
        self.run_initial_analysis().await
    }

    /// Run summary and risk detection concurrently
    pub async fn run_initial_analysis(&self) -> InitialAnalysis {
        let (summary, risks) = futures::join!(self.refresh_summary(), self.refresh_risks());
        InitialAnalysis { summary, risks }
    }

    /// Close the active session without loading a new document
    pub fn reset(&self) -> Generation {
        let mut s = self.state();
        if let Some(key) = s.invalidate() {
            self.audio.stop(&key);
        }
        info!(generation = s.generation.value(), "Session reset");
        s.generation
    }

    // ==================== Analysis panels ====================

    pub async fn refresh_summary(&self) -> Result<String, SessionError> {
        let (generation, text) = {
            let mut s = self.state();
            let text = s.document_text()?;
            let generation = s.claim(RequestKey::Summary)?;
            s.summary.begin();
            (generation, text)
        };

        let result = self.flows.summarize(&text).await;

        let mut s = self.state();
        s.in_flight.finish(&RequestKey::Summary, generation);
        s.check(generation)?;
        match result {
            Ok(summary) => {
                s.summary.succeed(summary.clone());
                s.translations.clear();
                s.summary_language = Language::En;
                s.requested_language = Language::En;
                s.translation_status = RequestStatus::Idle;
                Ok(summary)
            }
            Err(err) => {
                s.summary.fail(&err);
                Err(err.into())
            }
        }
    }

    pub async fn refresh_risks(&self) -> Result<Vec<RiskItem>, SessionError> {
        let (generation, text) = {
            let mut s = self.state();
            let text = s.document_text()?;
            let generation = s.claim(RequestKey::Risks)?;
            s.risks.begin();
            (generation, text)
        };

        let result = self.flows.detect_risks(&text).await;

        let mut s = self.state();
        s.in_flight.finish(&RequestKey::Risks, generation);
        s.check(generation)?;
        match result {
            Ok(detected) => {
                let items: Vec<RiskItem> = detected.into_iter().map(RiskItem::from).collect();
                debug!(count = items.len(), "Risks detected");
                s.risks.succeed(items.clone());
                Ok(items)
            }
            Err(err) => {
                s.risks.fail(&err);
                Err(err.into())
            }
        }
    }

    /// Fetch the negotiation suggestion for one risk. A risk that already has
    /// a suggestion returns it without calling the model.
    pub async fn suggest_negotiation(&self, index: usize) -> Result<String, SessionError> {
        let (generation, description) = {
            let mut s = self.state();
            let risk = s
                .risks
                .value()
                .and_then(|risks| risks.get(index))
                .ok_or(SessionError::RiskNotFound(index))?;
            if let Some(suggestion) = &risk.suggestion {
                return Ok(suggestion.clone());
            }
            let description = risk.description.clone();
            let generation = s.claim(RequestKey::Suggestion(index))?;
            if let Some(risk) = s.risks.value_mut().and_then(|risks| risks.get_mut(index)) {
                risk.suggestion_loading = true;
            }
            (generation, description)
        };

        let result = self.flows.suggest_negotiation(&description).await;

        let mut s = self.state();
        s.in_flight.finish(&RequestKey::Suggestion(index), generation);
        s.check(generation)?;
        // the risk list may have been refreshed meanwhile
        let risk = s
            .risks
            .value_mut()
            .and_then(|risks| risks.get_mut(index))
            .filter(|risk| risk.description == description)
            .ok_or(SessionError::RiskNotFound(index))?;
        risk.suggestion_loading = false;
        match result {
            Ok(suggestion) => Ok(risk.suggestion.get_or_insert(suggestion).clone()),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn extract_obligations(
        &self,
        user_party: &str,
        other_party: &str,
    ) -> Result<ExtractObligationsOutput, SessionError> {
        let (generation, text) = {
            let mut s = self.state();
            let text = s.document_text()?;
            let generation = s.claim(RequestKey::Obligations)?;
            s.obligations.begin();
            (generation, text)
        };

        let result = self.flows.extract_obligations(&text, user_party, other_party).await;

        let mut s = self.state();
        s.in_flight.finish(&RequestKey::Obligations, generation);
        s.check(generation)?;
        match result {
            Ok(obligations) => {
                s.obligations.succeed(obligations.clone());
                Ok(obligations)
            }
            Err(err) => {
                s.obligations.fail(&err);
                Err(err.into())
            }
        }
    }

    /// Extract obligations for the configured default parties
    pub async fn extract_default_obligations(&self) -> Result<ExtractObligationsOutput, SessionError> {
        let SessionConfig {
            user_party,
            other_party,
        } = self.config.clone();
        self.extract_obligations(&user_party, &other_party).await
    }

    // ==================== Conversation ====================

    /// Ask a question about the active document.
    ///
    /// The question is appended to the transcript immediately and removed
    /// again if answering fails.
    pub async fn ask_question(&self, question: &str) -> Result<String, SessionError> {
        let (generation, text) = {
            let mut s = self.state();
            let text = s.document_text()?;
            s.conversation.submit(question)?;
            s.answer_status = RequestStatus::Pending;
            if let Some(key) = s.playback.stop() {
                self.audio.stop(&key);
            }
            (s.generation, text)
        };

        let result = self.flows.answer_question(&text, question).await;

        let mut s = self.state();
        s.check(generation)?;
        match result {
            Ok(answer) => {
                s.conversation.resolve(answer.clone())?;
                s.answer_status = RequestStatus::Succeeded;
                Ok(answer)
            }
            Err(err) => {
                s.conversation.roll_back();
                s.answer_status = RequestStatus::Failed((&err).into());
                Err(err.into())
            }
        }
    }

    // ==================== Translation ====================

    /// Show the summary in `language`.
    ///
    /// English returns the original summary and cached languages are served
    /// from the translation cache; neither calls the model. Any playing clip
    /// is stopped.
    pub async fn translate_summary(&self, language: Language) -> Result<String, SessionError> {
        let (generation, source) = {
            let mut s = self.state();
            let source = match s.summary.value() {
                Some(summary) => summary.clone(),
                None if s.document.is_none() => return Err(SessionError::NoDocument),
                None => return Err(SessionError::NoSummary),
            };

            let ready = if language.is_original() {
                Some(source.clone())
            } else {
                s.translations.get(&language).cloned()
            };
            let generation = match ready {
                Some(_) => None,
                None => Some(s.claim(RequestKey::Translation(language))?),
            };

            s.requested_language = language;
            if let Some(key) = s.playback.stop() {
                self.audio.stop(&key);
            }

            match (ready, generation) {
                (Some(text), _) => {
                    s.summary_language = language;
                    s.translation_status = RequestStatus::Idle;
                    return Ok(text);
                }
                (None, Some(generation)) => {
                    s.translation_status = RequestStatus::Pending;
                    (generation, source)
                }
                (None, None) => return Err(SessionError::NoSummary),
            }
        };

        let result = self.flows.translate(&source, language).await;

        let mut s = self.state();
        s.in_flight.finish(&RequestKey::Translation(language), generation);
        s.check(generation)?;
        if s.summary.value() != Some(&source) {
            debug!(language = %language, "Summary changed during translation, result discarded");
            return Err(SessionError::SummaryChanged);
        }

        let is_current = s.requested_language == language;
        match result {
            Ok(translated) => {
                s.translations.insert(language, translated.clone());
                if is_current {
                    s.summary_language = language;
                    s.translation_status = RequestStatus::Succeeded;
                }
                Ok(translated)
            }
            Err(err) => {
                if is_current {
                    s.translation_status = RequestStatus::Failed((&err).into());
                    s.requested_language = s.summary_language;
                }
                Err(err.into())
            }
        }
    }

    // ==================== Audio ====================

    /// Play (or stop, if it is playing) the summary in its displayed language
    pub async fn play_summary_audio(&self) -> Result<PlayOutcome, SessionError> {
        let (key, text) = {
            let s = self.state();
            if s.document.is_none() {
                return Err(SessionError::NoDocument);
            }
            let (language, text) = s.displayed_summary().ok_or(SessionError::NoSummary)?;
            (AudioKey::text(text.clone(), language), text)
        };
        self.play(key, text).await
    }

    /// Play (or stop, if it is playing) the answer at conversation turn `index`
    pub async fn play_turn_audio(&self, index: usize) -> Result<PlayOutcome, SessionError> {
        let text = {
            let s = self.state();
            match s.conversation.turn(index) {
                Some(turn) if turn.role == Role::Assistant => turn.text.clone(),
                _ => return Err(SessionError::TurnNotFound(index)),
            }
        };
        self.play(AudioKey::Turn(index), text).await
    }

    async fn play(&self, key: AudioKey, text: String) -> Result<PlayOutcome, SessionError> {
        let generation = {
            let mut s = self.state();
            let cached = s.audio_cache.get(&key).cloned();
            let decision = s.playback.request(&key, cached.is_some())?;
            match (decision, cached) {
                (PlayDecision::Stop(playing), _) => {
                    self.audio.stop(&playing);
                    return Ok(PlayOutcome::Stopped);
                }
                (PlayDecision::Start { previous }, Some(clip)) => {
                    if let Some(previous) = previous {
                        self.audio.stop(&previous);
                    }
                    return self.start_clip(&mut s, &key, &clip);
                }
                (PlayDecision::Start { previous }, None) | (PlayDecision::Load { previous }, _) => {
                    if let Some(previous) = previous {
                        self.audio.stop(&previous);
                    }
                    match s.claim(RequestKey::Speech(key.clone())) {
                        Ok(generation) => generation,
                        Err(err) => {
                            s.playback.failed(&key);
                            return Err(err);
                        }
                    }
                }
            }
        };

        debug!(clip = %key, "Synthesizing audio");
        let result = self.flows.synthesize_speech(&text).await;

        let mut s = self.state();
        s.in_flight.finish(&RequestKey::Speech(key.clone()), generation);
        s.check(generation)?;
        match result {
            Ok(clip) => {
                s.audio_cache.insert(key.clone(), clip.clone());
                if let AudioKey::Turn(index) = key
                    && let Err(err) = s.conversation.attach_audio(index, clip.clone())
                {
                    debug!("Clip not attached to turn: {}", err);
                }
                if s.playback.loaded(&key) {
                    self.start_clip(&mut s, &key, &clip)
                } else {
                    Ok(PlayOutcome::Abandoned)
                }
            }
            Err(err) => {
                s.playback.failed(&key);
                Err(err.into())
            }
        }
    }

    fn start_clip(
        &self,
        s: &mut SessionState,
        key: &AudioKey,
        clip: &AudioRef,
    ) -> Result<PlayOutcome, SessionError> {
        match self.audio.start(key, clip) {
            Ok(()) => Ok(PlayOutcome::Playing),
            Err(err) => {
                warn!(clip = %key, "Audio output failed: {}", err);
                s.playback.failed(key);
                Err(err.into())
            }
        }
    }

    pub fn stop_audio(&self) {
        let mut s = self.state();
        if let Some(key) = s.playback.stop() {
            self.audio.stop(&key);
        }
    }

    /// Mark the playing clip as ended if the output has gone quiet
    pub fn sync_playback(&self) {
        let mut s = self.state();
        if let Some(key) = s.playback.playing().cloned()
            && !self.audio.is_playing(&key)
        {
            s.playback.ended(&key);
        }
    }

    // ==================== Contract drafting ====================

    /// Draft a contract. Independent of the active document, so it survives
    /// document changes.
    pub async fn draft_contract(&self, input: &DraftContractInput) -> Result<String, SessionError> {
        let generation = {
            let mut s = self.state();
            let generation = s.claim(RequestKey::Draft)?;
            s.draft.begin();
            generation
        };

        let result = self.flows.draft_contract(input).await;

        let mut s = self.state();
        s.in_flight.finish(&RequestKey::Draft, generation);
        match result {
            Ok(contract) => {
                s.draft.succeed(contract.clone());
                Ok(contract)
            }
            Err(err) => {
                s.draft.fail(&err);
                Err(err.into())
            }
        }
    }

    // ==================== Accessors ====================

    pub fn generation(&self) -> Generation {
        self.state().generation
    }

    pub fn document(&self) -> Option<DocumentSession> {
        self.state().document.clone()
    }

    pub fn summary(&self) -> Panel<String> {
        self.state().summary.clone()
    }

    /// Summary in the currently selected language
    pub fn displayed_summary(&self) -> Option<(Language, String)> {
        self.state().displayed_summary()
    }

    pub fn summary_language(&self) -> Language {
        self.state().summary_language
    }

    pub fn translation_status(&self) -> RequestStatus {
        self.state().translation_status.clone()
    }

    pub fn risks(&self) -> Panel<Vec<RiskItem>> {
        self.state().risks.clone()
    }

    pub fn obligations(&self) -> Panel<ExtractObligationsOutput> {
        self.state().obligations.clone()
    }

    pub fn conversation(&self) -> Vec<ConversationTurn> {
        self.state().conversation.turns().to_vec()
    }

    pub fn conversation_state(&self) -> ConversationState {
        self.state().conversation.state()
    }

    pub fn answer_status(&self) -> RequestStatus {
        self.state().answer_status.clone()
    }

    pub fn draft(&self) -> Panel<String> {
        self.state().draft.clone()
    }

    pub fn clip_state(&self, key: &AudioKey) -> ClipState {
        self.state().playback.clip_state(key)
    }

    pub fn playing(&self) -> Option<AudioKey> {
        self.state().playback.playing().cloned()
    }

    pub fn has_cached_audio(&self, key: &AudioKey) -> bool {
        self.state().audio_cache.contains(key)
    }

    pub fn is_in_flight(&self, key: &RequestKey) -> bool {
        self.state().in_flight.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{FlowError, FlowErrorKind, FlowExecutor, FlowRegistry};
    use crate::ports::model_gateway::GatewayError;
    use crate::testing::{RecordingAudio, ScriptedModel};
    use clarity_domain::{CapabilityName, Severity};
    use serde_json::json;

    const RENT_CLAUSE: &str =
        "Tenant shall pay INR 25,000 monthly, due on the 5th; late payment incurs 10% penalty per day.";

    fn orchestrator(model: Arc<ScriptedModel>, audio: Arc<RecordingAudio>) -> SessionOrchestrator {
        let registry = Arc::new(FlowRegistry::builtin().unwrap());
        let flows = LegalFlows::new(Arc::new(FlowExecutor::new(registry, model)));
        SessionOrchestrator::new(flows, audio)
    }

    fn lease() -> DocumentSession {
        DocumentSession::new(RENT_CLAUSE, "lease.txt")
    }

    fn analysed(model: ScriptedModel) -> ScriptedModel {
        model
            .reply(
                CapabilityName::Summarize,
                json!({"summary": "You pay INR 25,000 every month by the 5th."}),
            )
            .reply(
                CapabilityName::DetectRisks,
                json!({"risks": [
                    {"description": "10% penalty per day of late payment", "severity": "High"},
                    {"description": "Due date is strict", "severity": "Low"}
                ]}),
            )
    }

    #[tokio::test]
    async fn test_load_document_runs_summary_and_risks() {
        let model = Arc::new(analysed(ScriptedModel::new()));
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));

        let analysis = orch.load_document(lease()).await;

        assert!(analysis.summary.is_ok());
        let risks = analysis.risks.unwrap();
        assert_eq!(risks[0].severity, Severity::High);
        assert_eq!(model.calls(CapabilityName::Summarize), 1);
        assert_eq!(model.calls(CapabilityName::DetectRisks), 1);
        assert_eq!(model.calls(CapabilityName::ExtractObligations), 0);
        assert_eq!(orch.summary().status(), &RequestStatus::Succeeded);
        assert_eq!(orch.risks().value().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_operations_need_a_document() {
        let orch = orchestrator(Arc::new(ScriptedModel::new()), Arc::new(RecordingAudio::new()));
        assert_eq!(orch.refresh_summary().await.unwrap_err(), SessionError::NoDocument);
        assert_eq!(orch.ask_question("Why?").await.unwrap_err(), SessionError::NoDocument);
        assert_eq!(
            orch.translate_summary(Language::Hindi).await.unwrap_err(),
            SessionError::NoDocument
        );
    }

    #[tokio::test]
    async fn test_duplicate_request_is_rejected_while_pending() {
        let model = Arc::new(ScriptedModel::new().reply(CapabilityName::Summarize, json!({"summary": "ok"})));
        let gate = model.gate(CapabilityName::Summarize);
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));
        orch.start_session(lease());

        let (first, second, _) = futures::join!(orch.refresh_summary(), async {
            tokio::task::yield_now().await;
            orch.refresh_summary().await
        }, async {
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            gate.notify_one();
        });

        assert_eq!(first.unwrap(), "ok");
        assert_eq!(second.unwrap_err(), SessionError::RequestInFlight(RequestKey::Summary));
        assert_eq!(model.calls(CapabilityName::Summarize), 1);
        assert!(!orch.is_in_flight(&RequestKey::Summary));
    }

    #[tokio::test]
    async fn test_results_for_replaced_document_are_discarded() {
        let model = Arc::new(analysed(ScriptedModel::new()));
        let summary_gate = model.gate(CapabilityName::Summarize);
        let risk_gate = model.gate(CapabilityName::DetectRisks);
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));

        let (analysis, new_generation) = futures::join!(orch.load_document(lease()), async {
            tokio::task::yield_now().await;
            let generation = orch.start_session(DocumentSession::new("Another deed", "deed.txt"));
            summary_gate.notify_one();
            risk_gate.notify_one();
            generation
        });

        assert!(analysis.summary.unwrap_err().is_stale());
        assert!(analysis.risks.unwrap_err().is_stale());
        assert_eq!(orch.generation(), new_generation);
        assert!(orch.summary().value().is_none());
        assert!(orch.risks().value().is_none());
        assert_eq!(orch.document().unwrap().file_name, "deed.txt");
        assert!(!orch.is_in_flight(&RequestKey::Summary));
    }

    #[tokio::test]
    async fn test_failed_answer_rolls_back_question() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply(CapabilityName::AnswerQuestion, json!({"answer": "By the 5th."}))
                .fail(CapabilityName::AnswerQuestion, GatewayError::Timeout),
        );
        let orch = orchestrator(model, Arc::new(RecordingAudio::new()));
        orch.start_session(lease());

        orch.ask_question("When is rent due?").await.unwrap();
        let before = orch.conversation();
        assert_eq!(before.len(), 2);

        let err = orch.ask_question("What is the penalty?").await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(orch.conversation(), before);
        assert_eq!(orch.conversation_state(), ConversationState::Idle);
        let notice = orch.answer_status().failure().cloned().unwrap();
        assert_eq!(notice.kind, FlowErrorKind::ModelUnavailable);
    }

    #[tokio::test]
    async fn test_second_question_rejected_while_awaiting() {
        let model = Arc::new(ScriptedModel::new().reply(CapabilityName::AnswerQuestion, json!({"answer": "Yes."})));
        let gate = model.gate(CapabilityName::AnswerQuestion);
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));
        orch.start_session(lease());

        let (first, second, _) = futures::join!(orch.ask_question("Is there a deposit?"), async {
            tokio::task::yield_now().await;
            orch.ask_question("Can I sublet?").await
        }, async {
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            gate.notify_one();
        });

        assert_eq!(first.unwrap(), "Yes.");
        assert_eq!(second.unwrap_err(), SessionError::AwaitingAnswer);
        let turns = orch.conversation();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].text, "Is there a deposit?");
        assert_eq!(model.calls(CapabilityName::AnswerQuestion), 1);
    }

    #[tokio::test]
    async fn test_suggestion_fetched_once_per_risk() {
        let model = Arc::new(analysed(ScriptedModel::new()).reply(
            CapabilityName::SuggestNegotiation,
            json!({"suggestion": "Ask for a flat late fee of INR 500 instead."}),
        ));
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));
        orch.load_document(lease()).await;

        let first = orch.suggest_negotiation(0).await.unwrap();
        let second = orch.suggest_negotiation(0).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(model.calls(CapabilityName::SuggestNegotiation), 1);
        let risk = orch.risks().value().unwrap()[0].clone();
        assert_eq!(risk.suggestion.as_deref(), Some(first.as_str()));
        assert!(!risk.suggestion_loading);
    }

    #[tokio::test]
    async fn test_failed_suggestion_can_be_retried() {
        let model = Arc::new(
            analysed(ScriptedModel::new())
                .fail(
                    CapabilityName::SuggestNegotiation,
                    GatewayError::ServiceUnavailable("503".to_string()),
                )
                .reply(CapabilityName::SuggestNegotiation, json!({"suggestion": "Negotiate."})),
        );
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));
        orch.load_document(lease()).await;

        assert!(orch.suggest_negotiation(1).await.unwrap_err().is_retryable());
        let risk = orch.risks().value().unwrap()[1].clone();
        assert!(risk.suggestion.is_none());
        assert!(!risk.suggestion_loading);

        assert_eq!(orch.suggest_negotiation(1).await.unwrap(), "Negotiate.");
        assert_eq!(orch.suggest_negotiation(5).await.unwrap_err(), SessionError::RiskNotFound(5));
    }

    #[tokio::test]
    async fn test_translate_then_back_to_english() {
        let model = Arc::new(
            analysed(ScriptedModel::new())
                .reply(CapabilityName::Translate, json!({"translatedText": "आप हर महीने 25,000 रुपये देते हैं।"})),
        );
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));
        orch.load_document(lease()).await;
        let original = orch.summary().value().cloned().unwrap();

        let hindi = orch.translate_summary(Language::Hindi).await.unwrap();
        assert_ne!(hindi, original);
        assert_eq!(orch.summary_language(), Language::Hindi);

        let english = orch.translate_summary(Language::En).await.unwrap();
        assert_eq!(english, original);
        assert_eq!(orch.displayed_summary().unwrap(), (Language::En, original));

        let again = orch.translate_summary(Language::Hindi).await.unwrap();
        assert_eq!(again, hindi);
        assert_eq!(model.calls(CapabilityName::Translate), 1);
    }

    #[tokio::test]
    async fn test_failed_translation_keeps_displayed_language() {
        let model = Arc::new(analysed(ScriptedModel::new()).fail(CapabilityName::Translate, GatewayError::Timeout));
        let orch = orchestrator(model, Arc::new(RecordingAudio::new()));
        orch.load_document(lease()).await;

        assert!(orch.translate_summary(Language::Tamil).await.is_err());
        assert_eq!(orch.summary_language(), Language::En);
        assert!(orch.translation_status().failure().unwrap().retryable);
    }

    #[tokio::test]
    async fn test_one_clip_at_a_time() {
        let model = Arc::new(
            analysed(ScriptedModel::new())
                .reply(CapabilityName::AnswerQuestion, json!({"answer": "By the 5th of each month."}))
                .speech("data:audio/wav;base64,U1VNTUFSWQ==")
                .speech("data:audio/wav;base64,QU5TV0VS"),
        );
        let audio = Arc::new(RecordingAudio::new());
        let orch = orchestrator(model.clone(), audio.clone());
        orch.load_document(lease()).await;
        orch.ask_question("When is rent due?").await.unwrap();

        assert_eq!(orch.play_summary_audio().await.unwrap(), PlayOutcome::Playing);
        let summary_key = orch.playing().unwrap();

        // RecordingAudio panics if two clips overlap
        assert_eq!(orch.play_turn_audio(1).await.unwrap(), PlayOutcome::Playing);
        assert_eq!(audio.active(), Some(AudioKey::Turn(1)));
        assert!(audio.stopped.lock().unwrap().contains(&summary_key));
        assert!(orch.conversation()[1].audio.is_some());

        // cached: no new synthesis
        assert_eq!(orch.play_summary_audio().await.unwrap(), PlayOutcome::Playing);
        assert_eq!(model.calls(CapabilityName::SynthesizeSpeech), 2);
        assert_eq!(orch.clip_state(&AudioKey::Turn(1)), ClipState::Stopped);

        // toggle off
        assert_eq!(orch.play_summary_audio().await.unwrap(), PlayOutcome::Stopped);
        assert!(audio.active().is_none());
        assert!(orch.has_cached_audio(&summary_key));
    }

    #[tokio::test]
    async fn test_only_answers_have_audio() {
        let model = Arc::new(ScriptedModel::new().reply(CapabilityName::AnswerQuestion, json!({"answer": "Yes."})));
        let orch = orchestrator(model, Arc::new(RecordingAudio::new()));
        orch.start_session(lease());
        orch.ask_question("Is there a deposit?").await.unwrap();

        assert_eq!(orch.play_turn_audio(0).await.unwrap_err(), SessionError::TurnNotFound(0));
        assert_eq!(orch.play_turn_audio(7).await.unwrap_err(), SessionError::TurnNotFound(7));
    }

    #[tokio::test]
    async fn test_failed_synthesis_caches_nothing() {
        let model = Arc::new(
            analysed(ScriptedModel::new()).fail(CapabilityName::SynthesizeSpeech, GatewayError::Timeout),
        );
        let orch = orchestrator(model, Arc::new(RecordingAudio::new()));
        orch.load_document(lease()).await;

        let err = orch.play_summary_audio().await.unwrap_err();
        assert!(matches!(err, SessionError::Flow(FlowError::ModelUnavailable { .. })));
        let (language, text) = orch.displayed_summary().unwrap();
        let key = AudioKey::text(text, language);
        assert!(!orch.has_cached_audio(&key));
        assert_eq!(orch.clip_state(&key), ClipState::Stopped);
    }

    #[tokio::test]
    async fn test_output_failure_keeps_cached_clip() {
        let model = Arc::new(analysed(ScriptedModel::new()).speech("data:audio/wav;base64,AAAA"));
        let audio = Arc::new(RecordingAudio::new());
        let orch = orchestrator(model.clone(), audio.clone());
        orch.load_document(lease()).await;
        audio.fail_next_start();

        assert!(matches!(
            orch.play_summary_audio().await.unwrap_err(),
            SessionError::AudioOutput(_)
        ));
        assert!(orch.playing().is_none());

        assert_eq!(orch.play_summary_audio().await.unwrap(), PlayOutcome::Playing);
        assert_eq!(model.calls(CapabilityName::SynthesizeSpeech), 1);
    }

    #[tokio::test]
    async fn test_natural_end_releases_clip() {
        let model = Arc::new(analysed(ScriptedModel::new()).speech("data:audio/wav;base64,AAAA"));
        let audio = Arc::new(RecordingAudio::new());
        let orch = orchestrator(model, audio.clone());
        orch.load_document(lease()).await;
        orch.play_summary_audio().await.unwrap();

        audio.finish();
        orch.sync_playback();
        assert!(orch.playing().is_none());
    }

    #[tokio::test]
    async fn test_language_switch_stops_audio() {
        let model = Arc::new(
            analysed(ScriptedModel::new())
                .speech("data:audio/wav;base64,AAAA")
                .reply(CapabilityName::Translate, json!({"translatedText": "ಬಾಡಿಗೆ"})),
        );
        let audio = Arc::new(RecordingAudio::new());
        let orch = orchestrator(model, audio.clone());
        orch.load_document(lease()).await;
        orch.play_summary_audio().await.unwrap();

        orch.translate_summary(Language::Kannada).await.unwrap();
        assert!(audio.active().is_none());
        assert!(orch.playing().is_none());
        assert_eq!(orch.displayed_summary().unwrap().0, Language::Kannada);
    }

    #[tokio::test]
    async fn test_new_document_clears_derived_state() {
        let model = Arc::new(
            analysed(ScriptedModel::new())
                .reply(CapabilityName::Translate, json!({"translatedText": "வாடகை"}))
                .speech("data:audio/wav;base64,AAAA"),
        );
        let audio = Arc::new(RecordingAudio::new());
        let orch = orchestrator(model, audio.clone());
        orch.load_document(lease()).await;
        orch.translate_summary(Language::Tamil).await.unwrap();
        orch.play_summary_audio().await.unwrap();

        let before = orch.generation();
        orch.start_session(DocumentSession::new("Sale deed", "deed.txt"));

        assert_eq!(orch.generation(), before.next());
        assert!(audio.active().is_none());
        assert!(orch.summary().value().is_none());
        assert_eq!(orch.summary_language(), Language::En);
        assert!(orch.conversation().is_empty());
        assert!(orch.playing().is_none());
    }

    #[tokio::test]
    async fn test_draft_survives_document_change() {
        let model = Arc::new(
            ScriptedModel::new().reply(CapabilityName::DraftContract, json!({"contractText": "AGREEMENT"})),
        );
        let gate = model.gate(CapabilityName::DraftContract);
        let orch = orchestrator(model, Arc::new(RecordingAudio::new()));
        let input = DraftContractInput {
            client_name: "Asha Rao".to_string(),
            freelancer_name: "Vikram Iyer".to_string(),
            project_scope: "Build an inventory app".to_string(),
            payment_amount: 80000.0,
            payment_terms: "Monthly milestones".to_string(),
            deadline: "30 June 2025".to_string(),
        };

        let (draft, _) = futures::join!(orch.draft_contract(&input), async {
            tokio::task::yield_now().await;
            orch.start_session(lease());
            gate.notify_one();
        });

        assert_eq!(draft.unwrap(), "AGREEMENT");
        assert_eq!(orch.draft().value().map(String::as_str), Some("AGREEMENT"));
    }

    #[tokio::test]
    async fn test_obligations_use_configured_parties() {
        let model = Arc::new(ScriptedModel::new().reply(
            CapabilityName::ExtractObligations,
            json!({"userObligations": ["Deliver on time"], "otherPartyObligations": ["Pay invoices"]}),
        ));
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()))
            .with_config(SessionConfig::with_parties("FREELANCER", "CLIENT"));
        orch.start_session(lease());

        let out = orch.extract_default_obligations().await.unwrap();
        assert_eq!(out.other_party_obligations, vec!["Pay invoices"]);
        assert!(model.last_request().unwrap().prompt.contains("\"FREELANCER\""));
    }

    #[tokio::test]
    async fn test_reset_closes_session() {
        let model = Arc::new(analysed(ScriptedModel::new()));
        let orch = orchestrator(model, Arc::new(RecordingAudio::new()));
        orch.load_document(lease()).await;

        orch.reset();
        assert!(orch.document().is_none());
        assert!(orch.risks().value().is_none());
        assert_eq!(orch.refresh_risks().await.unwrap_err(), SessionError::NoDocument);
    }

    fn deed() -> DocumentSession {
        DocumentSession::new("Sale deed for plot 14, Whitefield", "deed.txt")
    }

    #[tokio::test]
    async fn test_translation_of_replaced_summary_is_discarded() {
        let model = Arc::new(
            analysed(ScriptedModel::new())
                .reply(CapabilityName::Summarize, json!({"summary": "Rent is INR 25,000; late fees apply."}))
                .reply(CapabilityName::Translate, json!({"translatedText": "पुराना सारांश"})),
        );
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));
        orch.load_document(lease()).await;
        let gate = model.gate(CapabilityName::Translate);

        let (translated, refreshed) = futures::join!(orch.translate_summary(Language::Hindi), async {
            tokio::task::yield_now().await;
            let refreshed = orch.refresh_summary().await;
            gate.notify_one();
            refreshed
        });

        assert_eq!(translated.unwrap_err(), SessionError::SummaryChanged);
        let current = refreshed.unwrap();
        assert_eq!(orch.displayed_summary().unwrap(), (Language::En, current));
        assert_eq!(orch.summary_language(), Language::En);
        assert!(!orch.is_in_flight(&RequestKey::Translation(Language::Hindi)));
    }

    #[tokio::test]
    async fn test_late_answer_does_not_touch_new_transcript() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply(CapabilityName::AnswerQuestion, json!({"answer": "By the 5th."}))
                .reply(CapabilityName::AnswerQuestion, json!({"answer": "Plot 14."})),
        );
        let gate = model.gate(CapabilityName::AnswerQuestion);
        let orch = orchestrator(model, Arc::new(RecordingAudio::new()));
        orch.start_session(lease());

        let (answer, _) = futures::join!(orch.ask_question("When is rent due?"), async {
            tokio::task::yield_now().await;
            orch.start_session(deed());
            gate.notify_one();
        });

        assert!(matches!(answer.unwrap_err(), SessionError::StaleGeneration { .. }));
        assert!(orch.conversation().is_empty());
        assert_eq!(orch.conversation_state(), ConversationState::Idle);
        assert_eq!(orch.answer_status(), RequestStatus::Idle);

        // the new session can ask straight away
        gate.notify_one();
        assert_eq!(orch.ask_question("Which plot?").await.unwrap(), "Plot 14.");
        assert_eq!(orch.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_late_suggestion_is_discarded() {
        let model = Arc::new(
            analysed(ScriptedModel::new())
                .reply(CapabilityName::SuggestNegotiation, json!({"suggestion": "Cap it at 2%."})),
        );
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));
        orch.load_document(lease()).await;
        let gate = model.gate(CapabilityName::SuggestNegotiation);

        let (suggestion, _) = futures::join!(orch.suggest_negotiation(0), async {
            tokio::task::yield_now().await;
            orch.start_session(deed());
            gate.notify_one();
        });

        assert!(matches!(suggestion.unwrap_err(), SessionError::StaleGeneration { .. }));
        assert!(orch.risks().value().is_none());
        assert!(!orch.is_in_flight(&RequestKey::Suggestion(0)));
        assert_eq!(orch.document().unwrap().file_name, "deed.txt");
    }

    #[tokio::test]
    async fn test_late_translation_is_discarded() {
        let model = Arc::new(
            analysed(ScriptedModel::new()).reply(CapabilityName::Translate, json!({"translatedText": "வாடகை"})),
        );
        let orch = orchestrator(model.clone(), Arc::new(RecordingAudio::new()));
        orch.load_document(lease()).await;
        let gate = model.gate(CapabilityName::Translate);

        let (translated, _) = futures::join!(orch.translate_summary(Language::Tamil), async {
            tokio::task::yield_now().await;
            orch.start_session(deed());
            gate.notify_one();
        });

        assert!(matches!(translated.unwrap_err(), SessionError::StaleGeneration { .. }));
        assert_eq!(orch.summary_language(), Language::En);
        assert_eq!(orch.translation_status(), RequestStatus::Idle);
        assert!(orch.displayed_summary().is_none());
        assert!(!orch.is_in_flight(&RequestKey::Translation(Language::Tamil)));
    }

    #[tokio::test]
    async fn test_late_clip_stays_out_of_new_cache() {
        let model = Arc::new(analysed(ScriptedModel::new()).speech("data:audio/wav;base64,AAAA"));
        let audio = Arc::new(RecordingAudio::new());
        let orch = orchestrator(model.clone(), audio.clone());
        orch.load_document(lease()).await;
        let (language, text) = orch.displayed_summary().unwrap();
        let key = AudioKey::text(text, language);
        let gate = model.gate(CapabilityName::SynthesizeSpeech);

        let (played, _) = futures::join!(orch.play_summary_audio(), async {
            tokio::task::yield_now().await;
            orch.start_session(deed());
            gate.notify_one();
        });

        assert!(matches!(played.unwrap_err(), SessionError::StaleGeneration { .. }));
        assert!(!orch.has_cached_audio(&key));
        assert_eq!(orch.clip_state(&key), ClipState::Stopped);
        assert!(orch.playing().is_none());
        assert!(audio.started.lock().unwrap().is_empty());
        assert!(!orch.is_in_flight(&RequestKey::Speech(key)));
    }
}
