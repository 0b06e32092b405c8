//! Speak command - synthesize text to speech.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::speech::SpeechSynthesizer;
use anyhow::Result;
use std::path::PathBuf;

/// Run the speak command.
pub async fn run_speak(text: &str, output: Option<PathBuf>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Speak) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let synthesizer = SpeechSynthesizer::new(&settings.speech.synthesis_model, &settings.speech.voice);

    let spinner = Output::spinner("Synthesizing speech...");
    let temp_path = match synthesizer.synthesize(text).await {
        Ok(path) => {
            spinner.finish_and_clear();
            path
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Synthesis failed: {}", e));
            return Err(e.into());
        }
    };

    let final_path = match output {
        Some(dest) => {
            std::fs::rename(&temp_path, &dest).or_else(|_| {
                // Rename fails across filesystems; fall back to copy
                std::fs::copy(&temp_path, &dest)
                    .map(|_| ())
                    .and_then(|_| std::fs::remove_file(&temp_path))
            })?;
            dest
        }
        None => temp_path,
    };

    Output::success(&format!("Audio written to {}", final_path.display()));
    Ok(())
}
