//! Listen command - microphone transcription.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::speech::SpeechTranscriber;
use anyhow::Result;
use std::path::PathBuf;

/// Run the listen command.
pub async fn run_listen(
    file: Option<PathBuf>,
    duration: Option<u32>,
    settings: Settings,
) -> Result<()> {
    // Transcribing an existing file does not need ffmpeg
    let operation = if file.is_some() { Operation::Transcribe } else { Operation::Listen };
    if let Err(e) = preflight::check(operation) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let transcriber = SpeechTranscriber::new(&settings.speech.transcription_model);

    let text = match file {
        Some(path) => {
            let spinner = Output::spinner("Transcribing...");
            let result = transcriber.transcribe_file(&path).await;
            spinner.finish_and_clear();
            result?
        }
        None => {
            let duration = duration.unwrap_or(settings.speech.record_seconds);
            Output::info(&format!("Recording for {} seconds... Speak now.", duration));
            transcriber
                .listen_from_mic(duration, settings.speech.sample_rate)
                .await?
        }
    };

    println!("{}", text);
    Ok(())
}
