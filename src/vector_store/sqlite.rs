//! SQLite-based vector store implementation.
//!
//! Persists the index to a single database file, with cosine similarity
//! computed in Rust. Exact nearest-neighbor search over a tutor-sized
//! knowledge base is fast enough that no ANN structure is needed.

use super::{cosine_similarity, Document, IndexedSource, SearchResult, VectorStore};
use crate::error::{MaskotError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    source_id TEXT NOT NULL,
    file_name TEXT NOT NULL,
    attribution TEXT,
    focus_area TEXT,
    content TEXT NOT NULL,
    start_offset INTEGER NOT NULL,
    chunk_order INTEGER NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_source_id ON documents(source_id);
"#;

const DOCUMENT_COLUMNS: &str =
    "id, source_id, file_name, attribution, focus_area, content, start_offset, chunk_order, embedding, indexed_at";

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a vector store at the given path.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| MaskotError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to little-endian bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    /// Map a row with [`DOCUMENT_COLUMNS`] to a [`Document`].
    fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
        let id_str: String = row.get(0)?;
        let embedding_bytes: Vec<u8> = row.get(8)?;
        let indexed_at_str: String = row.get(9)?;

        Ok(Document {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            source_id: row.get(1)?,
            file_name: row.get(2)?,
            attribution: row.get(3)?,
            focus_area: row.get(4)?,
            content: row.get(5)?,
            start_offset: row.get(6)?,
            chunk_order: row.get(7)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    fn insert_document(tx: &Connection, doc: &Document) -> Result<()> {
        let embedding_bytes = Self::embedding_to_bytes(&doc.embedding);

        tx.execute(
            r#"
            INSERT OR REPLACE INTO documents
            (id, source_id, file_name, attribution, focus_area, content,
             start_offset, chunk_order, embedding, indexed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                doc.id.to_string(),
                doc.source_id,
                doc.file_name,
                doc.attribution,
                doc.focus_area,
                doc.content,
                doc.start_offset,
                doc.chunk_order,
                embedding_bytes,
                doc.indexed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, doc))]
    async fn upsert(&self, doc: &Document) -> Result<()> {
        let conn = self.lock_conn()?;
        Self::insert_document(&conn, doc)?;
        debug!("Upserted document {}", doc.id);
        Ok(())
    }

    #[instrument(skip(self, docs))]
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let conn = self.lock_conn()?;
        let tx = conn.unchecked_transaction()?;

        for doc in docs {
            Self::insert_document(&tx, doc)?;
        }

        tx.commit()?;
        info!("Batch upserted {} documents", docs.len());
        Ok(docs.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.search_with_threshold(query_embedding, limit, f32::MIN).await
    }

    #[instrument(skip(self, query_embedding))]
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents"))?;
        let docs = stmt.query_map([], Self::row_to_document)?;

        let mut results: Vec<SearchResult> = docs
            .filter_map(|doc_result| doc_result.ok())
            .map(|doc| {
                let score = cosine_similarity(query_embedding, &doc.embedding);
                SearchResult { document: doc, score }
            })
            .filter(|r| r.score >= min_score)
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        debug!("Found {} matching documents", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn delete_by_source_id(&self, source_id: &str) -> Result<usize> {
        let conn = self.lock_conn()?;

        let deleted = conn.execute(
            "DELETE FROM documents WHERE source_id = ?1",
            params![source_id],
        )?;

        info!("Deleted {} documents for source {}", deleted, source_id);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<usize> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute("DELETE FROM documents", [])?;
        info!("Cleared {} documents from index", deleted);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source_id, file_name, COUNT(*) as chunk_count,
                   MAX(indexed_at) as indexed_at
            FROM documents
            GROUP BY source_id
            ORDER BY source_id
            "#,
        )?;

        let sources = stmt.query_map([], |row| {
            let indexed_at_str: String = row.get(3)?;
            Ok(IndexedSource {
                source_id: row.get(0)?,
                file_name: row.get(1)?,
                chunk_count: row.get(2)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        Ok(sources.filter_map(|s| s.ok()).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_source_id(&self, source_id: &str) -> Result<Vec<Document>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE source_id = ?1 ORDER BY chunk_order"
        ))?;
        let docs = stmt.query_map(params![source_id], Self::row_to_document)?;

        let result: Vec<Document> = docs.filter_map(|d| d.ok()).collect();
        debug!("Found {} documents for source {}", result.len(), source_id);
        Ok(result)
    }

    async fn document_count(&self) -> Result<usize> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source_id: &str, content: &str, order: i32, embedding: Vec<f32>) -> Document {
        Document::new(
            source_id.to_string(),
            format!("{source_id}.txt"),
            Some("test handbook".to_string()),
            None,
            content.to_string(),
            (order as i64) * 800,
            order,
            embedding,
        )
    }

    #[tokio::test]
    async fn test_upsert_and_search() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store
            .upsert_batch(&[
                doc("biology", "cells divide", 0, vec![1.0, 0.0, 0.0]),
                doc("biology", "plants grow", 1, vec![0.0, 1.0, 0.0]),
                doc("physics", "objects fall", 0, vec![0.0, 0.0, 1.0]),
            ])
            .await
            .unwrap();

        assert_eq!(store.document_count().await.unwrap(), 3);

        let results = store.search(&[1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.content, "cells divide");
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_embedding_round_trip() {
        let embedding = vec![0.25, -1.5, 3.75, 0.0];
        let bytes = SqliteVectorStore::embedding_to_bytes(&embedding);
        assert_eq!(bytes.len(), 16);
        assert_eq!(SqliteVectorStore::bytes_to_embedding(&bytes), embedding);
    }

    #[tokio::test]
    async fn test_sources_and_delete() {
        let store = SqliteVectorStore::in_memory().unwrap();
        store
            .upsert_batch(&[
                doc("biology", "cells divide", 0, vec![1.0]),
                doc("biology", "plants grow", 1, vec![1.0]),
                doc("physics", "objects fall", 0, vec![1.0]),
            ])
            .await
            .unwrap();

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].source_id, "biology");
        assert_eq!(sources[0].chunk_count, 2);

        let chunks = store.get_by_source_id("biology").await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_order, 0);
        assert_eq!(chunks[0].attribution.as_deref(), Some("test handbook"));

        assert_eq!(store.delete_by_source_id("physics").await.unwrap(), 1);
        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.db");

        {
            let store = SqliteVectorStore::new(&path).unwrap();
            store
                .upsert(&doc("biology", "cells divide", 0, vec![1.0, 0.0]))
                .await
                .unwrap();
        }

        let reopened = SqliteVectorStore::new(&path).unwrap();
        assert_eq!(reopened.document_count().await.unwrap(), 1);

        let results = reopened.search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results[0].document.content, "cells divide");
    }
}
