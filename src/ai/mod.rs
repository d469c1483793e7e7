//! Generative model integration
//!
//! Defines the [`GenerativeModel`] seam used by the renderer, chat sessions
//! and the application, with a Vertex AI REST implementation and an
//! in-memory mock.

pub mod chat;
pub mod mock;
pub mod vertex;

pub use chat::ChatSession;
pub use mock::MockGenerativeModel;
pub use vertex::VertexModel;

use crate::models::{Content, GenerationResponse, GroundingTool};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send the conversation `contents` with an optional grounding tool.
    async fn generate_content(
        &self,
        contents: &[Content],
        tool: &GroundingTool,
    ) -> Result<GenerationResponse>;

    /// One-shot request with a single user prompt.
    async fn generate(&self, prompt: &str, tool: &GroundingTool) -> Result<GenerationResponse> {
        self.generate_content(&[Content::user(prompt)], tool).await
    }
}
