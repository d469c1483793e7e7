use super::GenerativeModel;
use crate::models::{Content, GenerationResponse, GroundingTool};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A request as seen by [`MockGenerativeModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub contents: Vec<Content>,
    pub tool: GroundingTool,
}

#[derive(Clone)]
pub struct MockGenerativeModel {
    responses: Arc<Mutex<Vec<GenerationResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    fail_with: Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockGenerativeModel {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, response: GenerationResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_text_response(self, text: &str) -> Self {
        self.with_response(GenerationResponse::from_text(text))
    }

    /// Make every call fail with an `AiProvider` error.
    pub fn with_error(self, message: &str) -> Self {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGenerativeModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeModel for MockGenerativeModel {
    async fn generate_content(
        &self,
        contents: &[Content],
        tool: &GroundingTool,
    ) -> Result<GenerationResponse> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.requests.lock().unwrap().push(RecordedRequest {
            contents: contents.to_vec(),
            tool: tool.clone(),
        });

        if let Some(message) = self.fail_with.lock().unwrap().as_ref() {
            return Err(Error::AiProvider(message.clone()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response
            let prompt = contents.last().map(Content::text).unwrap_or_default();
            Ok(GenerationResponse::from_text(format!("Mock answer to: {}", prompt)))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
