//! The two-step query pipeline: retrieve, then generate.

use super::{AnswerGenerator, ContextBuilder, ContextChunk};
use crate::error::Result;
use tracing::{info, instrument};

/// State threaded through the pipeline steps.
#[derive(Debug, Default)]
pub struct QueryState {
    /// The user's question.
    pub question: String,
    /// Chunks retrieved for the question.
    pub context: Vec<ContextChunk>,
    /// The generated answer.
    pub answer: String,
}

impl QueryState {
    /// Start a pipeline run for a question.
    pub fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            ..Default::default()
        }
    }
}

/// Fixed retrieve-then-generate sequence over [`QueryState`].
pub struct QueryPipeline {
    context_builder: ContextBuilder,
    generator: AnswerGenerator,
}

impl QueryPipeline {
    pub fn new(context_builder: ContextBuilder, generator: AnswerGenerator) -> Self {
        Self {
            context_builder,
            generator,
        }
    }

    /// Step 1: fill `state.context` with chunks retrieved for the question.
    async fn retrieve(&self, mut state: QueryState) -> Result<QueryState> {
        state.context = self.context_builder.build(&state.question).await?;
        Ok(state)
    }

    /// Step 2: fill `state.answer` from the question and its context.
    async fn generate(&self, mut state: QueryState) -> Result<QueryState> {
        state.answer = self
            .generator
            .generate(&state.question, &state.context)
            .await?;
        Ok(state)
    }

    /// Run both steps in order and return the final state.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn run(&self, question: &str) -> Result<QueryState> {
        info!("Processing question: {}", question);

        let state = QueryState::new(question);
        let state = self.retrieve(state).await?;
        let state = self.generate(state).await?;

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::rag::NO_CONTEXT_FALLBACK;
    use crate::vector_store::MemoryVectorStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_empty_index_yields_fallback() {
        // An empty store means retrieval returns nothing, so the pipeline
        // finishes without any model call
        let store = Arc::new(MemoryVectorStore::new());
        let embedder: Arc<dyn Embedder> = Arc::new(NullEmbedder);

        let pipeline = QueryPipeline::new(
            ContextBuilder::new(store, embedder),
            AnswerGenerator::new("gpt-4o-mini"),
        );

        let state = pipeline.run("What is photosynthesis?").await.unwrap();
        assert_eq!(state.question, "What is photosynthesis?");
        assert!(state.context.is_empty());
        assert_eq!(state.answer, NO_CONTEXT_FALLBACK);
    }

    /// Embedder that never calls the network.
    struct NullEmbedder;

    #[async_trait::async_trait]
    impl Embedder for NullEmbedder {
        async fn embed(&self, _text: &str) -> crate::error::Result<Vec<f32>> {
            Ok(vec![0.0; 4])
        }

        async fn embed_batch(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
        }

        fn dimensions(&self) -> usize {
            4
        }
    }
}
