//! Grounded generation with Gemini on Vertex AI
//!
//! Sends prompts with or without grounding (Google Search or a Vertex AI
//! Search data store) and renders grounded answers as Markdown with inline
//! footnotes and a list of sources.

pub mod ai;
pub mod app;
pub mod display;
pub mod error;
pub mod models;
pub mod prompts;
pub mod render;

pub use error::{Error, Result};
