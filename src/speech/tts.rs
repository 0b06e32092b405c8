//! Text-to-speech synthesis.

use crate::error::{MaskotError, Result};
use crate::openai::create_client;
use async_openai::types::{CreateSpeechRequestArgs, SpeechModel, Voice};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Synthesizes speech with the OpenAI speech API.
pub struct SpeechSynthesizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: SpeechModel,
    voice: Voice,
}

impl SpeechSynthesizer {
    /// Create a synthesizer for the given model and voice names.
    ///
    /// Unknown voice names fall back to the default voice.
    pub fn new(model: &str, voice: &str) -> Self {
        Self {
            client: create_client(),
            model: parse_model(model),
            voice: parse_voice(voice),
        }
    }

    /// Convert text to speech.
    ///
    /// Writes the synthesized MP3 to a temporary file and returns its path.
    /// The caller owns the file and is responsible for cleaning it up.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn synthesize(&self, text: &str) -> Result<PathBuf> {
        if text.trim().is_empty() {
            return Err(MaskotError::InvalidInput("Cannot speak empty text".to_string()));
        }

        let request = CreateSpeechRequestArgs::default()
            .input(text)
            .model(self.model.clone())
            .voice(self.voice.clone())
            .build()
            .map_err(|e| MaskotError::Speech(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| MaskotError::OpenAI(format!("Speech API error: {}", e)))?;

        let temp_file = tempfile::Builder::new()
            .prefix("maskot-speech-")
            .suffix(".mp3")
            .tempfile()?;

        let (_, path) = temp_file
            .keep()
            .map_err(|e| MaskotError::Speech(format!("Failed to keep temp file: {}", e)))?;

        tokio::fs::write(&path, &response.bytes).await?;

        debug!("Wrote synthesized speech to {}", path.display());
        Ok(path)
    }
}

fn parse_model(model: &str) -> SpeechModel {
    match model {
        "tts-1" => SpeechModel::Tts1,
        "tts-1-hd" => SpeechModel::Tts1Hd,
        other => SpeechModel::Other(other.to_string()),
    }
}

fn parse_voice(voice: &str) -> Voice {
    match voice.to_lowercase().as_str() {
        "alloy" => Voice::Alloy,
        "echo" => Voice::Echo,
        "fable" => Voice::Fable,
        "onyx" => Voice::Onyx,
        "nova" => Voice::Nova,
        "shimmer" => Voice::Shimmer,
        _ => Voice::Alloy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let synthesizer = SpeechSynthesizer::new("tts-1", "alloy");
        let result = synthesizer.synthesize("   ").await;
        assert!(matches!(result, Err(MaskotError::InvalidInput(_))));
    }

    #[test]
    fn test_voice_parsing_falls_back() {
        assert!(matches!(parse_voice("nova"), Voice::Nova));
        assert!(matches!(parse_voice("NOVA"), Voice::Nova));
        assert!(matches!(parse_voice("unknown-voice"), Voice::Alloy));
    }

    #[test]
    fn test_model_parsing() {
        assert!(matches!(parse_model("tts-1"), SpeechModel::Tts1));
        assert!(matches!(parse_model("tts-1-hd"), SpeechModel::Tts1Hd));
        assert!(matches!(parse_model("custom"), SpeechModel::Other(_)));
    }
}
