//! In-memory vector store implementation.
//!
//! Useful for testing and small document collections.

use super::{cosine_similarity, Document, IndexedSource, SearchResult, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, doc: &Document) -> Result<()> {
        let mut docs = self.documents.write().unwrap();
        docs.insert(doc.id.to_string(), doc.clone());
        Ok(())
    }

    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.documents.write().unwrap();
        for doc in docs {
            store.insert(doc.id.to_string(), doc.clone());
        }
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.search_with_threshold(query_embedding, limit, f32::MIN).await
    }

    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let docs = self.documents.read().unwrap();

        let mut results: Vec<SearchResult> = docs
            .values()
            .map(|doc| {
                let score = cosine_similarity(query_embedding, &doc.embedding);
                SearchResult {
                    document: doc.clone(),
                    score,
                }
            })
            .filter(|r| r.score >= min_score)
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn delete_by_source_id(&self, source_id: &str) -> Result<usize> {
        let mut docs = self.documents.write().unwrap();
        let initial_len = docs.len();
        docs.retain(|_, doc| doc.source_id != source_id);
        Ok(initial_len - docs.len())
    }

    async fn clear(&self) -> Result<usize> {
        let mut docs = self.documents.write().unwrap();
        let removed = docs.len();
        docs.clear();
        Ok(removed)
    }

    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let docs = self.documents.read().unwrap();

        let mut source_map: HashMap<String, IndexedSource> = HashMap::new();

        for doc in docs.values() {
            let entry = source_map
                .entry(doc.source_id.clone())
                .or_insert_with(|| IndexedSource {
                    source_id: doc.source_id.clone(),
                    file_name: doc.file_name.clone(),
                    chunk_count: 0,
                    indexed_at: doc.indexed_at,
                });

            entry.chunk_count += 1;
            if doc.indexed_at > entry.indexed_at {
                entry.indexed_at = doc.indexed_at;
            }
        }

        let mut sources: Vec<IndexedSource> = source_map.into_values().collect();
        sources.sort_by(|a, b| a.source_id.cmp(&b.source_id));

        Ok(sources)
    }

    async fn get_by_source_id(&self, source_id: &str) -> Result<Vec<Document>> {
        let docs = self.documents.read().unwrap();
        let mut result: Vec<Document> = docs
            .values()
            .filter(|d| d.source_id == source_id)
            .cloned()
            .collect();
        result.sort_by_key(|d| d.chunk_order);
        Ok(result)
    }

    async fn document_count(&self) -> Result<usize> {
        let docs = self.documents.read().unwrap();
        Ok(docs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source_id: &str, content: &str, order: i32, embedding: Vec<f32>) -> Document {
        Document::new(
            source_id.to_string(),
            format!("{source_id}.txt"),
            None,
            None,
            content.to_string(),
            0,
            order,
            embedding,
        )
    }

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        store
            .upsert_batch(&[
                doc("lesson", "hello world", 0, vec![1.0, 0.0, 0.0]),
                doc("lesson", "goodbye world", 1, vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();

        assert_eq!(store.document_count().await.unwrap(), 2);

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].document.content, "hello world");

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].chunk_count, 2);
    }

    #[tokio::test]
    async fn test_threshold_filters_results() {
        let store = MemoryVectorStore::new();
        store
            .upsert_batch(&[
                doc("a", "close", 0, vec![1.0, 0.0]),
                doc("b", "far", 0, vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store
            .search_with_threshold(&[1.0, 0.0], 10, 0.5)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.source_id, "a");
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = MemoryVectorStore::new();
        store
            .upsert_batch(&[
                doc("a", "one", 0, vec![1.0]),
                doc("a", "two", 1, vec![1.0]),
                doc("b", "three", 0, vec![1.0]),
            ])
            .await
            .unwrap();

        assert_eq!(store.delete_by_source_id("a").await.unwrap(), 2);
        assert_eq!(store.document_count().await.unwrap(), 1);

        assert_eq!(store.clear().await.unwrap(), 1);
        assert_eq!(store.document_count().await.unwrap(), 0);
    }
}
