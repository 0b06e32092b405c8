//! Maskot - Retrieval-Augmented Tutor
//!
//! The backend for a talking tutor mascot. The name comes from the
//! Norwegian word for "mascot."
//!
//! # Overview
//!
//! Maskot lets you:
//! - Index a folder of study material (text, Markdown, PDF)
//! - Ask questions and get concise, grounded answers
//! - Tag each answer with an emotion label for mascot animation
//! - Serve a small HTTP API for the mascot front end
//! - Transcribe speech and synthesize spoken answers
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `ingest` - Knowledge base loading and text cleanup
//! - `chunking` - Overlapping fixed-size text chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector index abstraction
//! - `rag` - Retrieve-then-generate query pipeline
//! - `emotion` - Rule-based emotion classification
//! - `session` - In-memory chat session bookkeeping
//! - `speech` - Speech-to-text and text-to-speech helpers
//! - `orchestrator` - Indexing pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use maskot::config::Settings;
//! use maskot::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     // Load the index (or build it from the knowledge base folder)
//!     orchestrator.ensure_index().await?;
//!
//!     let pipeline = orchestrator.query_pipeline(None);
//!     let state = pipeline.run("What is photosynthesis?").await?;
//!     println!("{}", state.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod emotion;
pub mod error;
pub mod ingest;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod session;
pub mod speech;
pub mod vector_store;

pub use error::{MaskotError, Result};
