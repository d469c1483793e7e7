//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Response has no candidates")]
    NoCandidates,

    #[error("Response candidate has no grounding metadata")]
    MissingGroundingMetadata,

    /// A grounding support points outside the text or moves backwards.
    #[error(
        "Invalid grounding segment: end index {end_index} (previous end {prev_index}, text is {text_len} bytes)"
    )]
    InvalidSegment {
        prev_index: usize,
        end_index: usize,
        text_len: usize,
    },

    /// A grounding support boundary splits a multi-byte character.
    #[error("Grounding segment {start}..{end} is not valid UTF-8: {source}")]
    SegmentDecode {
        start: usize,
        end: usize,
        #[source]
        source: std::str::Utf8Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
