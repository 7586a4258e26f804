//! Test doubles shared by the flow and session tests

use crate::ports::audio_output::{AudioOutput, AudioOutputError};
use crate::ports::model_gateway::{GatewayError, GenerativeModel, ModelReply, ModelRequest};
use async_trait::async_trait;
use clarity_domain::{AudioKey, AudioRef, CapabilityName};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Model with per-capability reply queues.
///
/// Each call pops the next reply for its capability. A capability can be
/// gated: its calls block until the test releases the gate with
/// `notify_one`.
#[derive(Default)]
pub(crate) struct ScriptedModel {
    replies: Mutex<HashMap<CapabilityName, VecDeque<Result<ModelReply, GatewayError>>>>,
    calls: Mutex<Vec<ModelRequest>>,
    gates: Mutex<HashMap<CapabilityName, Arc<Notify>>>,
}

impl ScriptedModel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, capability: CapabilityName, reply: Result<ModelReply, GatewayError>) {
        self.replies
            .lock()
            .unwrap()
            .entry(capability)
            .or_default()
            .push_back(reply);
    }

    pub(crate) fn reply(self, capability: CapabilityName, value: Value) -> Self {
        self.push(capability, Ok(ModelReply::Structured(value)));
        self
    }

    pub(crate) fn speech(self, uri: &str) -> Self {
        self.push(
            CapabilityName::SynthesizeSpeech,
            Ok(ModelReply::Speech(AudioRef::new(uri))),
        );
        self
    }

    pub(crate) fn fail(self, capability: CapabilityName, error: GatewayError) -> Self {
        self.push(capability, Err(error));
        self
    }

    /// Make calls for `capability` wait until the returned gate is notified
    pub(crate) fn gate(&self, capability: CapabilityName) -> Arc<Notify> {
        self.gates
            .lock()
            .unwrap()
            .entry(capability)
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    pub(crate) fn calls(&self, capability: CapabilityName) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.capability == capability)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn last_request(&self) -> Option<ModelRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, GatewayError> {
        self.calls.lock().unwrap().push(request.clone());

        let gate = self.gates.lock().unwrap().get(&request.capability).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.replies
            .lock()
            .unwrap()
            .get_mut(&request.capability)
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| {
                Err(GatewayError::RequestFailed(format!(
                    "no scripted reply for {}",
                    request.capability
                )))
            })
    }
}

/// Audio output that records start/stop calls
#[derive(Default)]
pub(crate) struct RecordingAudio {
    pub(crate) started: Mutex<Vec<AudioKey>>,
    pub(crate) stopped: Mutex<Vec<AudioKey>>,
    active: Mutex<Option<AudioKey>>,
    fail_next: Mutex<bool>,
}

impl RecordingAudio {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_next_start(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub(crate) fn active(&self) -> Option<AudioKey> {
        self.active.lock().unwrap().clone()
    }

    /// Simulate the clip running out
    pub(crate) fn finish(&self) {
        *self.active.lock().unwrap() = None;
    }
}

impl AudioOutput for RecordingAudio {
    fn start(&self, key: &AudioKey, _clip: &AudioRef) -> Result<(), AudioOutputError> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(AudioOutputError::Failed("device busy".to_string()));
        }
        let mut active = self.active.lock().unwrap();
        assert!(active.is_none(), "a clip was started while another played");
        *active = Some(key.clone());
        self.started.lock().unwrap().push(key.clone());
        Ok(())
    }

    fn stop(&self, key: &AudioKey) {
        let mut active = self.active.lock().unwrap();
        if active.as_ref() == Some(key) {
            *active = None;
        }
        self.stopped.lock().unwrap().push(key.clone());
    }

    fn is_playing(&self, key: &AudioKey) -> bool {
        self.active.lock().unwrap().as_ref() == Some(key)
    }
}
