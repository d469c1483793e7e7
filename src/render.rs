//! Markdown rendering of model responses
//!
//! Grounded responses get inline `[n]` footnotes after every supported
//! segment, followed by a "Grounding Sources" section listing the issued
//! queries and the numbered source chunks. Citation offsets are byte offsets
//! into the UTF-8 response text.

use crate::models::{GenerationResponse, GroundingMetadata, GroundingQueries};
use crate::{Error, Result};

const SOURCES_HEADER: &str = "\n----\n## Grounding Sources\n";
const CHUNKS_HEADER: &str = "### Grounding Chunks\n";

/// Render a response for display, picking the grounded or plain path.
///
/// Responses without grounding metadata render as their plain text.
pub fn render_response(response: &GenerationResponse) -> Result<String> {
    let candidate = response.candidates.first().ok_or(Error::NoCandidates)?;

    match &candidate.grounding_metadata {
        Some(metadata) => render_grounded(&candidate.text(), metadata),
        None => Ok(candidate.text()),
    }
}

/// Render a grounded response. The first candidate must carry grounding
/// metadata.
pub fn render_grounded_response(response: &GenerationResponse) -> Result<String> {
    let candidate = response.candidates.first().ok_or(Error::NoCandidates)?;
    let metadata = candidate
        .grounding_metadata
        .as_ref()
        .ok_or(Error::MissingGroundingMetadata)?;

    render_grounded(&candidate.text(), metadata)
}

/// Render `text` with the footnotes and source list described by `metadata`.
pub fn render_grounded(text: &str, metadata: &GroundingMetadata) -> Result<String> {
    let bytes = text.as_bytes();
    let mut markdown = String::new();
    let mut prev_index = 0;

    for support in &metadata.grounding_supports {
        let end_index = support.segment.end_index;
        if end_index < prev_index || end_index > bytes.len() {
            return Err(Error::InvalidSegment {
                prev_index,
                end_index,
                text_len: bytes.len(),
            });
        }

        let segment = decode(bytes, prev_index, end_index)?;
        let footnotes: String = support
            .grounding_chunk_indices
            .iter()
            .map(|i| format!("[{}]", i + 1))
            .collect();

        markdown.push_str(&format!("{} {}\n", segment, footnotes));
        prev_index = end_index;
    }

    if prev_index < bytes.len() {
        markdown.push_str(decode(bytes, prev_index, bytes.len())?);
    }

    markdown.push_str(SOURCES_HEADER);

    match metadata.queries() {
        GroundingQueries::Web {
            queries,
            search_entry_point,
        } => {
            markdown.push_str(&format!("\n**Web Search Queries:** {}\n", queries.join(", ")));
            if let Some(rendered) = search_entry_point {
                markdown.push_str(&format!("\n**Search Entry Point:**\n {}\n", rendered));
            }
        }
        GroundingQueries::Retrieval { queries } => {
            markdown.push_str(&format!("\n**Retrieval Queries:** {}\n", queries.join(", ")));
        }
        GroundingQueries::None => {}
    }

    markdown.push_str(CHUNKS_HEADER);

    for (index, chunk) in metadata.grounding_chunks.iter().enumerate() {
        let index = index + 1;
        match chunk.source() {
            Some(source) => {
                markdown.push_str(&format!("{}. [{}]({})\n", index, source.title(), source.uri()));
            }
            None => {
                tracing::warn!(
                    "Skipping grounding chunk {} with neither a web nor a retrieved-context source",
                    index
                );
            }
        }
    }

    Ok(markdown)
}

fn decode(bytes: &[u8], start: usize, end: usize) -> Result<&str> {
    std::str::from_utf8(&bytes[start..end])
        .map_err(|source| Error::SegmentDecode { start, end, source })
}
