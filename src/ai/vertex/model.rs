//! Gemini on Vertex AI, behind the [`GenerativeModel`] seam.

use super::client::VertexHttpClient;
use crate::ai::GenerativeModel;
use crate::models::{Config, Content, GenerationResponse, GroundingTool};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

/// Wire form of a grounding tool. Exactly one field is set.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    #[serde(skip_serializing_if = "Option::is_none")]
    google_search: Option<Empty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    google_search_retrieval: Option<Empty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retrieval: Option<Retrieval>,
}

#[derive(Debug, Serialize)]
struct Empty {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Retrieval {
    vertex_ai_search: VertexAiSearch,
}

#[derive(Debug, Serialize)]
struct VertexAiSearch {
    datastore: String,
}

pub struct VertexModel {
    http: VertexHttpClient,
}

impl VertexModel {
    pub fn new(config: &Config) -> Self {
        Self::new_with_client(config, reqwest::Client::new())
    }

    pub fn new_with_client(config: &Config, client: reqwest::Client) -> Self {
        Self {
            http: VertexHttpClient::new_with_client(config, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    fn tools(&self, tool: &GroundingTool) -> Vec<Tool> {
        match tool {
            GroundingTool::None => Vec::new(),
            // Gemini 1.x only understands the legacy retrieval-style search tool.
            GroundingTool::GoogleSearch if self.model().starts_with("gemini-1") => vec![Tool {
                google_search_retrieval: Some(Empty {}),
                ..Default::default()
            }],
            GroundingTool::GoogleSearch => vec![Tool {
                google_search: Some(Empty {}),
                ..Default::default()
            }],
            GroundingTool::VertexSearch { datastore } => vec![Tool {
                retrieval: Some(Retrieval {
                    vertex_ai_search: VertexAiSearch {
                        datastore: datastore.clone(),
                    },
                }),
                ..Default::default()
            }],
        }
    }
}

#[async_trait]
impl GenerativeModel for VertexModel {
    async fn generate_content(
        &self,
        contents: &[Content],
        tool: &GroundingTool,
    ) -> Result<GenerationResponse> {
        tracing::debug!(
            "Generating content with {} (tool: {:?}, {} contents)",
            self.model(),
            tool,
            contents.len()
        );

        let request = GenerateContentRequest {
            contents,
            tools: self.tools(tool),
        };

        let response: GenerationResponse = self.http.generate_content(&request).await?;

        if let Some(usage) = &response.usage_metadata {
            tracing::debug!(
                "Token usage: prompt={:?} candidates={:?} total={:?}",
                usage.prompt_token_count,
                usage.candidates_token_count,
                usage.total_token_count
            );
        }

        Ok(response)
    }
}
