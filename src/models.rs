//! Data models and structures
//!
//! Defines the `generateContent` response model (candidates and their
//! grounding metadata), the grounding tool selection, and the process
//! configuration used to build the Vertex AI client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One turn of a conversation, as sent to and returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role("model", text)
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of all non-thought parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

/// A content part. Only text parts are produced by this crate; other part
/// kinds returned by the service deserialize with `text: None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerationResponse {
    /// Single-candidate response with plain model text and no grounding.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Content::model(text),
                finish_reason: Some("STOP".to_string()),
                grounding_metadata: None,
            }],
            usage_metadata: None,
        }
    }

    /// Text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        self.candidates.first().map(Candidate::text)
    }
}

/// Candidate completion item returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Absent when the request carried no grounding tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

impl Candidate {
    pub fn text(&self) -> String {
        self.content.text()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

/// Grounding information attached to a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_supports: Vec<GroundingSupport>,
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search_queries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval_queries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_entry_point: Option<SearchEntryPoint>,
}

impl GroundingMetadata {
    /// Queries issued by whichever grounding source was active.
    ///
    /// Web queries win if a response ever carries both kinds.
    pub fn queries(&self) -> GroundingQueries<'_> {
        match (
            non_empty(&self.web_search_queries),
            non_empty(&self.retrieval_queries),
        ) {
            (Some(queries), _) => GroundingQueries::Web {
                queries,
                search_entry_point: self
                    .search_entry_point
                    .as_ref()
                    .and_then(|e| e.rendered_content.as_deref()),
            },
            (None, Some(queries)) => GroundingQueries::Retrieval { queries },
            (None, None) => GroundingQueries::None,
        }
    }
}

fn non_empty(queries: &Option<Vec<String>>) -> Option<&[String]> {
    queries.as_deref().filter(|q| !q.is_empty())
}

/// Query list of the active grounding source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundingQueries<'a> {
    Web {
        queries: &'a [String],
        /// Pre-rendered search widget markup, passed through untouched.
        search_entry_point: Option<&'a str>,
    },
    Retrieval {
        queries: &'a [String],
    },
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntryPoint {
    pub rendered_content: Option<String>,
    pub sdk_blob: Option<String>,
}

/// Ties a byte range of the response text to the chunks that support it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingSupport {
    #[serde(default)]
    pub segment: Segment,
    #[serde(default)]
    pub grounding_chunk_indices: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confidence_scores: Vec<f64>,
}

/// Byte offsets into the response text. `end_index` is exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub start_index: usize,
    #[serde(default)]
    pub end_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A supporting reference. The service normally sets one of the two fields;
/// `web` wins when both are present and a chunk may also carry neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<SourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved_context: Option<SourceRef>,
}

impl GroundingChunk {
    pub fn source(&self) -> Option<ChunkSource<'_>> {
        match (&self.web, &self.retrieved_context) {
            (Some(web), _) => Some(ChunkSource::Web(web)),
            (None, Some(context)) => Some(ChunkSource::RetrievedContext(context)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkSource<'a> {
    Web(&'a SourceRef),
    RetrievedContext(&'a SourceRef),
}

impl<'a> ChunkSource<'a> {
    fn reference(&self) -> &'a SourceRef {
        match *self {
            ChunkSource::Web(r) | ChunkSource::RetrievedContext(r) => r,
        }
    }

    pub fn title(&self) -> &'a str {
        self.reference().title.as_deref().unwrap_or_default()
    }

    pub fn uri(&self) -> &'a str {
        self.reference().uri.as_deref().unwrap_or_default()
    }
}

/// Augmentation attached to a model request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroundingTool {
    #[default]
    None,
    /// Public web search.
    GoogleSearch,
    /// A Vertex AI Search data store, by full resource name.
    VertexSearch { datastore: String },
}

/// Grounding choice as picked on the command line; resolved into a
/// [`GroundingTool`] once the configured datastore is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GroundingKind {
    #[default]
    None,
    GoogleSearch,
    VertexSearch,
}

// Configuration
const DEFAULT_LOCATION: &str = "us-central1";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_DATA_STORE_REGION: &str = "global";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: String,
    pub location: String,
    pub access_token: String,
    pub model: String,
    pub api_endpoint: Option<String>,
    pub data_store_id: Option<String>,
    pub data_store_region: String,
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first
    /// when one exists.
    pub fn from_env() -> crate::Result<Self> {
        allow_missing_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| crate::Error::Config(format!("{} not set", key)))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let timeout = match optional("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                crate::Error::Config(format!("Invalid REQUEST_TIMEOUT_SECS '{}'", raw))
            })?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            project_id: required("GOOGLE_CLOUD_PROJECT")?,
            location: optional("GOOGLE_CLOUD_REGION").unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            access_token: required("GOOGLE_CLOUD_ACCESS_TOKEN")?,
            model: optional("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_endpoint: optional("VERTEX_API_ENDPOINT"),
            data_store_id: optional("DATA_STORE_ID"),
            data_store_region: optional("DATA_STORE_REGION")
                .unwrap_or_else(|| DEFAULT_DATA_STORE_REGION.to_string()),
            timeout,
        })
    }

    /// Base URL of the regional Vertex AI endpoint, unless overridden.
    pub fn endpoint(&self) -> String {
        match &self.api_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None if self.location == "global" => "https://aiplatform.googleapis.com".to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }

    /// Full resource name of the configured Vertex AI Search data store.
    pub fn datastore_path(&self) -> Option<String> {
        self.data_store_id.as_ref().map(|id| {
            format!(
                "projects/{}/locations/{}/collections/default_collection/dataStores/{}",
                self.project_id, self.data_store_region, id
            )
        })
    }
}

/// A missing `.env` is fine; one that fails to parse is not.
fn allow_missing_dotenv<T>(result: std::result::Result<T, dotenvy::Error>) -> crate::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}
