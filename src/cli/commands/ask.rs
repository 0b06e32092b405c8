//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::emotion::EmotionClassifier;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use console::style;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    show_sources: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'maskot doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    orchestrator.ensure_index().await?;

    let pipeline = orchestrator.query_pipeline(model.as_deref());

    let spinner = Output::spinner("Searching knowledge base...");

    match pipeline.run(question).await {
        Ok(state) => {
            spinner.finish_and_clear();

            let emotion = EmotionClassifier::new().classify(&state.answer);

            println!("\n{}\n", state.answer);
            println!("{} {}", style("Emotion:").dim(), emotion);

            if show_sources && !state.context.is_empty() {
                Output::header("Sources");
                for chunk in &state.context {
                    Output::source_result(
                        &chunk.file_name,
                        chunk.focus_area.as_deref(),
                        chunk.score,
                        &chunk.content,
                    );
                }
            }

            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            Err(e.into())
        }
    }
}
