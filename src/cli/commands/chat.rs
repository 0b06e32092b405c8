//! Interactive chat command.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::emotion::EmotionClassifier;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::session::SessionStore;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'maskot doctor' for detailed diagnostics.");
        return Err(e);
    }

    let orchestrator = Orchestrator::new(settings)?;
    orchestrator.ensure_index().await?;

    let pipeline = orchestrator.query_pipeline(model.as_deref());
    let classifier = EmotionClassifier::new();
    let sessions = SessionStore::new();
    let mut session_id = sessions.resolve(None);

    println!("\n{}", style("Maskot Chat").bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to start a new session.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break; // EOF
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session_id = sessions.resolve(None);
            Output::info("Started a new session.");
            continue;
        }

        match pipeline.run(input).await {
            Ok(state) => {
                sessions.record_turn(&session_id, input, &state.answer);
                let emotion = classifier.classify(&state.answer);
                println!(
                    "\n{} {} {}\n",
                    style("Maskot:").cyan().bold(),
                    state.answer,
                    style(format!("({})", emotion)).dim()
                );
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
