//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::error::{MaskotError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Indexing requires an API key (embeddings).
    Index,
    /// Asking questions requires an API key.
    Ask,
    /// Serving runs the full pipeline, so it needs an API key.
    Serve,
    /// Microphone transcription needs ffmpeg and an API key.
    Listen,
    /// Transcribing an existing file only needs an API key.
    Transcribe,
    /// Speech synthesis requires an API key.
    Speak,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Index
        | Operation::Ask
        | Operation::Serve
        | Operation::Transcribe
        | Operation::Speak => {
            check_api_key()?;
        }
        Operation::Listen => {
            check_api_key()?;
            check_tool("ffmpeg")?;
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(MaskotError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(MaskotError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(MaskotError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MaskotError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(MaskotError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
