//! Speech-to-text: microphone capture and transcription.

use crate::error::{MaskotError, Result};
use crate::openai::create_client;
use async_openai::types::CreateTranscriptionRequestArgs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Transcribes recorded speech with the OpenAI transcription API.
pub struct SpeechTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl SpeechTranscriber {
    /// Create a transcriber for the given model (e.g. `whisper-1`).
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }

    /// Transcribe an existing audio file to text.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    pub async fn transcribe_file(&self, audio_path: &Path) -> Result<String> {
        let file_bytes = tokio::fs::read(audio_path).await?;

        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let request = CreateTranscriptionRequestArgs::default()
            .file(async_openai::types::AudioInput::from_vec_u8(file_name, file_bytes))
            .model(&self.model)
            .build()
            .map_err(|e| MaskotError::Speech(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| MaskotError::OpenAI(format!("Transcription API error: {}", e)))?;

        let text = response.text.trim().to_string();
        debug!("Transcribed {} characters", text.len());
        Ok(text)
    }

    /// Record from the default microphone and transcribe the recording.
    ///
    /// Captures `duration_secs` of mono audio at `sample_rate` Hz into a
    /// temporary WAV file via ffmpeg, then transcribes it.
    #[instrument(skip(self))]
    pub async fn listen_from_mic(&self, duration_secs: u32, sample_rate: u32) -> Result<String> {
        let temp_dir = tempfile::tempdir()?;
        let wav_path = temp_dir.path().join("recording.wav");

        info!("Recording for {} seconds...", duration_secs);
        record_microphone(&wav_path, duration_secs, sample_rate).await?;

        self.transcribe_file(&wav_path).await
    }
}

/// Capture microphone input to a WAV file using ffmpeg.
///
/// The capture device flag depends on the platform audio stack.
async fn record_microphone(dest: &PathBuf, duration_secs: u32, sample_rate: u32) -> Result<()> {
    let (input_format, input_device) = if cfg!(target_os = "macos") {
        ("avfoundation", ":0")
    } else if cfg!(target_os = "windows") {
        ("dshow", "audio=default")
    } else {
        ("alsa", "default")
    };

    let result = Command::new("ffmpeg")
        .arg("-f").arg(input_format)
        .arg("-i").arg(input_device)
        .arg("-t").arg(duration_secs.to_string())
        .arg("-ar").arg(sample_rate.to_string())
        .arg("-ac").arg("1")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(MaskotError::Speech(format!("Microphone capture failed: {}", err.trim())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MaskotError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(MaskotError::Speech(format!("ffmpeg error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transcribe_missing_file_errors() {
        let transcriber = SpeechTranscriber::new("whisper-1");
        let result = transcriber
            .transcribe_file(Path::new("/nonexistent/recording.wav"))
            .await;
        assert!(matches!(result, Err(MaskotError::Io(_))));
    }
}
