//! Multi-turn chat on top of any [`GenerativeModel`].

use super::GenerativeModel;
use crate::models::{Content, GenerationResponse, GroundingTool};
use crate::Result;

/// Conversation state for one chat. Each `send_message` is one round trip
/// carrying the full history.
pub struct ChatSession<'a> {
    model: &'a dyn GenerativeModel,
    history: Vec<Content>,
}

impl<'a> ChatSession<'a> {
    pub fn new(model: &'a dyn GenerativeModel) -> Self {
        Self {
            model,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Send `prompt` after the existing history.
    ///
    /// The turn is only recorded when the model answers with a candidate;
    /// failed calls leave the history untouched.
    pub async fn send_message(
        &mut self,
        prompt: &str,
        tool: &GroundingTool,
    ) -> Result<GenerationResponse> {
        let user = Content::user(prompt);
        let mut contents = self.history.clone();
        contents.push(user.clone());

        tracing::debug!(
            "Sending chat message (turn {}, {} prior contents)",
            self.history.len() / 2 + 1,
            self.history.len()
        );

        let response = self.model.generate_content(&contents, tool).await?;

        match response.candidates.first() {
            Some(candidate) => {
                // Only text parts round-trip through `Part`; anything else
                // would be sent back as an empty object.
                let mut reply = candidate.content.clone();
                reply.role = Some("model".to_string());
                reply.parts.retain(|part| part.text.is_some());
                self.history.push(user);
                self.history.push(reply);
            }
            None => tracing::warn!("Chat response had no candidates; turn not recorded"),
        }

        Ok(response)
    }
}
