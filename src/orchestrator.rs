//! Pipeline orchestrator for Maskot.
//!
//! Wires settings, prompts, embedder, and vector store together; owns the
//! indexing pipeline (load, clean, chunk, embed, upsert) and the
//! load-or-rebuild behavior on startup.

use crate::chunking::CharacterChunker;
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::ingest::{load_documents, SourceDocument};
use crate::rag::{AnswerGenerator, ContextBuilder, QueryPipeline};
use crate::vector_store::{Document, SqliteVectorStore, VectorStore};
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the Maskot pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl Orchestrator {
    /// Create a new orchestrator with the SQLite-backed index.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let vector_store = Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?);

        Ok(Self {
            settings,
            prompts,
            embedder,
            vector_store,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            settings,
            prompts,
            embedder,
            vector_store,
        }
    }

    /// Get a reference to the vector store.
    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.vector_store.clone()
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build a query pipeline, optionally overriding the answer model.
    pub fn query_pipeline(&self, model: Option<&str>) -> QueryPipeline {
        let context_builder = ContextBuilder::new(self.vector_store(), self.embedder())
            .with_top_k(self.settings.rag.top_k)
            .with_min_score(self.settings.rag.min_score);

        let generator = AnswerGenerator::new(model.unwrap_or(&self.settings.rag.model))
            .with_prompts(self.prompts.clone())
            .with_max_answer_tokens(self.settings.rag.max_answer_tokens)
            .with_temperature(self.settings.rag.temperature);

        QueryPipeline::new(context_builder, generator)
    }

    /// Use the existing index if it has documents, otherwise build it from
    /// the knowledge base folder.
    #[instrument(skip(self))]
    pub async fn ensure_index(&self) -> Result<IndexReport> {
        let existing = self.vector_store.document_count().await?;

        if existing > 0 {
            info!("Loaded existing index ({} chunks)", existing);
            return Ok(IndexReport {
                documents: 0,
                chunks_indexed: existing,
                rebuilt: false,
            });
        }

        info!("No index found, building from knowledge base");
        self.build_index(false).await
    }

    /// Ingest the knowledge base folder and index every chunk.
    ///
    /// With `force`, the existing index is wiped first.
    #[instrument(skip(self), fields(force = force))]
    pub async fn build_index(&self, force: bool) -> Result<IndexReport> {
        if force {
            let removed = self.vector_store.clear().await?;
            info!("Cleared {} chunks from index", removed);
        }

        let documents = load_documents(&self.settings.knowledge_base_dir()).await?;

        let chunker = CharacterChunker::new(
            self.settings.chunking.chunk_size,
            self.settings.chunking.chunk_overlap,
        );

        let mut indexed = 0usize;
        for source in &documents {
            indexed += self.index_source(&chunker, source).await?;
        }

        info!("Indexed {} chunks from {} documents", indexed, documents.len());

        Ok(IndexReport {
            documents: documents.len(),
            chunks_indexed: indexed,
            rebuilt: true,
        })
    }

    /// Chunk, embed, and upsert a single source document.
    async fn index_source(
        &self,
        chunker: &CharacterChunker,
        source: &SourceDocument,
    ) -> Result<usize> {
        let chunks = chunker.chunk(&source.content);
        if chunks.is_empty() {
            return Ok(0);
        }

        // Replace any stale chunks for this source
        self.vector_store.delete_by_source_id(&source.id).await?;

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let attribution = (!source.metadata.source.is_empty()).then(|| source.metadata.source.clone());
        let focus_area =
            (!source.metadata.focus_area.is_empty()).then(|| source.metadata.focus_area.clone());

        let documents: Vec<Document> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                Document::new(
                    source.id.clone(),
                    source.file_name.clone(),
                    attribution.clone(),
                    focus_area.clone(),
                    chunk.content,
                    chunk.start_offset as i64,
                    chunk.order,
                    embedding,
                )
            })
            .collect();

        self.vector_store.upsert_batch(&documents).await
    }
}

/// Result of preparing the index.
#[derive(Debug)]
pub struct IndexReport {
    /// Number of source documents processed (0 when the index was reused).
    pub documents: usize,
    /// Chunks now in the index (newly indexed, or already present).
    pub chunks_indexed: usize,
    /// Whether the index was (re)built on this run.
    pub rebuilt: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::vector_store::MemoryVectorStore;
    use async_trait::async_trait;

    /// Deterministic embedder for offline tests.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn orchestrator_for(kb_dir: &std::path::Path) -> Orchestrator {
        let mut settings = Settings::default();
        settings.knowledge_base.dir = kb_dir.to_string_lossy().to_string();

        Orchestrator::with_components(
            settings,
            Prompts::default(),
            Arc::new(StubEmbedder),
            Arc::new(MemoryVectorStore::new()),
        )
    }

    #[tokio::test]
    async fn test_build_index_from_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gravity.txt"), "Gravity pulls objects toward each other.")
            .unwrap();
        std::fs::write(dir.path().join("cells.txt"), "Cells are the unit of life.").unwrap();

        let orchestrator = orchestrator_for(dir.path());
        let report = orchestrator.build_index(false).await.unwrap();

        assert!(report.rebuilt);
        assert_eq!(report.documents, 2);
        assert_eq!(report.chunks_indexed, 2);
        assert_eq!(orchestrator.vector_store().document_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ensure_index_reuses_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gravity.txt"), "Gravity pulls objects down.").unwrap();

        let orchestrator = orchestrator_for(dir.path());
        let first = orchestrator.ensure_index().await.unwrap();
        assert!(first.rebuilt);

        let second = orchestrator.ensure_index().await.unwrap();
        assert!(!second.rebuilt);
        assert_eq!(second.chunks_indexed, first.chunks_indexed);
    }

    #[tokio::test]
    async fn test_force_rebuild_clears_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gravity.txt"), "Gravity pulls objects down.").unwrap();

        let orchestrator = orchestrator_for(dir.path());
        orchestrator.build_index(false).await.unwrap();
        let report = orchestrator.build_index(true).await.unwrap();

        assert!(report.rebuilt);
        assert_eq!(orchestrator.vector_store().document_count().await.unwrap(), 1);
    }
}
