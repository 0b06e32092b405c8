//! Configuration module for Maskot.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, TutorPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, KnowledgeBaseSettings, PromptSettings,
    RagSettings, ServerSettings, Settings, SpeechSettings, VectorStoreSettings,
};
