//! RAG (Retrieval-Augmented Generation) for tutor question answering.
//!
//! The pipeline is a fixed two-step sequence: retrieve context chunks for the
//! question, then generate a bounded-length answer grounded in them.

pub mod context;
mod pipeline;
mod response;

pub use context::ContextBuilder;
pub use pipeline::{QueryPipeline, QueryState};
pub use response::{AnswerGenerator, NO_CONTEXT_FALLBACK};

use crate::vector_store::SearchResult;

/// A retrieved chunk with display context.
#[derive(Debug, Clone)]
pub struct ContextChunk {
    /// Source document ID.
    pub source_id: String,
    /// Original file name.
    pub file_name: String,
    /// Attribution from the document body, if any.
    pub attribution: Option<String>,
    /// Topic tag from the document body, if any.
    pub focus_area: Option<String>,
    /// Text content.
    pub content: String,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            source_id: result.document.source_id,
            file_name: result.document.file_name,
            attribution: result.document.attribution,
            focus_area: result.document.focus_area,
            content: result.document.content,
            score: result.score,
        }
    }
}
