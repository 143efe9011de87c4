use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use super::error::ApiError;
use super::provider::AudioService;
use super::types::{AudioResult, CloneRequest, ServiceRequest, SynthesisRequest};

/// Mock behavior for the mock service
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MockBehavior {
    /// Return a generated URL unique to the call
    #[default]
    Success,
    /// Return the given URL
    ReturnUrl { audio_url: String },
    /// Return JSON without an audio_url
    MissingAudioUrl,
    /// Return a body that is not JSON
    MalformedResponse,
    /// Fail before any response arrives
    TransportError,
    /// Return a non-2xx status with no audio_url
    ServerError { status: u16 },
    /// Pop one behavior per call, then fall back to Success
    BehaviorQueue { behaviors: Vec<MockBehavior> },
}

/// Mock audio service for testing. Clones share state so a test can keep a
/// handle while the panel actor owns another.
#[derive(Clone)]
pub struct MockService {
    behavior: Arc<Mutex<MockBehavior>>,
    call_count: Arc<Mutex<usize>>,
    captured_requests: Arc<Mutex<Vec<ServiceRequest>>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockService {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            call_count: Arc::new(Mutex::new(0)),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Requests are captured immediately but do not respond until `release`
    /// hands out a permit, so tests can observe the in-flight state.
    pub fn paused(behavior: MockBehavior) -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new(behavior)
        }
    }

    /// Let `count` paused requests respond.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_captured_requests(&self) -> Vec<ServiceRequest> {
        self.captured_requests.lock().unwrap().clone()
    }

    pub fn get_last_captured_request(&self) -> Option<ServiceRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }

    fn pop_behavior(&self) -> MockBehavior {
        let mut behavior = self.behavior.lock().unwrap();
        if let MockBehavior::BehaviorQueue { behaviors } = &mut *behavior {
            if behaviors.is_empty() {
                return MockBehavior::Success;
            }
            return behaviors.remove(0);
        }
        behavior.clone()
    }

    async fn handle(&self, request: ServiceRequest) -> Result<AudioResult, ApiError> {
        let flow = request.flow();
        let call_number = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.captured_requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ApiError::Transport(anyhow!(e)))?
                .forget();
        }

        match self.pop_behavior() {
            MockBehavior::Success => Ok(AudioResult {
                audio_url: format!("https://mock.local/{flow}/{call_number}.mp3"),
            }),
            MockBehavior::ReturnUrl { audio_url } => Ok(AudioResult { audio_url }),
            MockBehavior::MissingAudioUrl => {
                AudioResult::from_response_body(br#"{"status": "queued"}"#)
            }
            MockBehavior::MalformedResponse => {
                AudioResult::from_response_body(b"Internal Server Error")
            }
            MockBehavior::TransportError => Err(ApiError::Transport(anyhow!(
                "mock connection refused"
            ))),
            MockBehavior::ServerError { status } => Err(ApiError::Status {
                status,
                body: "mock server error".to_string(),
            }),
            MockBehavior::BehaviorQueue { .. } => Err(ApiError::Transport(anyhow!(
                "nested behavior queues are not supported"
            ))),
        }
    }
}

#[async_trait]
impl AudioService for MockService {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn clone_audio(&self, request: &CloneRequest) -> Result<AudioResult, ApiError> {
        self.handle(ServiceRequest::Clone(request.clone())).await
    }

    async fn text_to_speech(&self, request: &SynthesisRequest) -> Result<AudioResult, ApiError> {
        self.handle(ServiceRequest::Synthesis(request.clone())).await
    }
}
