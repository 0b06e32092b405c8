//! Context building for RAG answers.

use super::ContextChunk;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use std::sync::Arc;
use tracing::debug;

/// Retrieves context chunks for a query.
pub struct ContextBuilder {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
    min_score: f32,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            top_k: 5,
            min_score: 0.0,
        }
    }

    /// Set the number of chunks to retrieve.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Retrieve the most similar chunks for a query.
    pub async fn build(&self, query: &str) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .vector_store
            .search_with_threshold(&query_embedding, self.top_k, self.min_score)
            .await?;

        debug!("Retrieved {} chunks for query", results.len());

        Ok(results.into_iter().map(ContextChunk::from).collect())
    }
}

/// Format context chunks for inclusion in a prompt.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format context chunks for display to the user.
pub fn format_context_for_display(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            let focus = chunk
                .focus_area
                .as_ref()
                .map(|f| format!(" [{}]", f))
                .unwrap_or_default();
            format!("{}{} (score: {:.2})", chunk.file_name, focus, chunk.score)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{Document, MemoryVectorStore, SearchResult};

    fn chunk(content: &str, score: f32) -> ContextChunk {
        ContextChunk::from(SearchResult {
            document: Document::new(
                "lesson".to_string(),
                "lesson.txt".to_string(),
                None,
                Some("biology".to_string()),
                content.to_string(),
                0,
                0,
                vec![],
            ),
            score,
        })
    }

    #[test]
    fn test_format_for_prompt_joins_contents() {
        let chunks = vec![chunk("first passage", 0.9), chunk("second passage", 0.8)];
        let formatted = format_context_for_prompt(&chunks);
        assert_eq!(formatted, "first passage\n\nsecond passage");
    }

    #[test]
    fn test_format_for_display_shows_scores() {
        let formatted = format_context_for_display(&[chunk("text", 0.87)]);
        assert!(formatted.contains("lesson.txt"));
        assert!(formatted.contains("[biology]"));
        assert!(formatted.contains("0.87"));
    }

    #[tokio::test]
    async fn test_builder_configuration() {
        let store = Arc::new(MemoryVectorStore::new());
        let embedder: Arc<dyn crate::embedding::Embedder> =
            Arc::new(crate::embedding::OpenAIEmbedder::with_config("test-model", 4));
        let builder = ContextBuilder::new(store, embedder)
            .with_top_k(3)
            .with_min_score(0.5);
        assert_eq!(builder.top_k, 3);
        assert!((builder.min_score - 0.5).abs() < f32::EPSILON);
    }
}
