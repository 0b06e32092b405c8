//! Index command - build the vector index from the knowledge base folder.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the index command.
pub async fn run_index(force: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index) {
        Output::error(&format!("{}", e));
        Output::info("Run 'maskot doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let kb_dir = settings.knowledge_base_dir();
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Indexing {}...", kb_dir.display()));

    let report = if force {
        orchestrator.build_index(true).await
    } else {
        orchestrator.ensure_index().await
    };

    match report {
        Ok(report) => {
            spinner.finish_and_clear();
            if report.rebuilt {
                Output::success(&format!(
                    "Indexed {} chunks from {} documents.",
                    report.chunks_indexed, report.documents
                ));
            } else {
                Output::info(&format!(
                    "Index already present ({} chunks). Use --force to rebuild.",
                    report.chunks_indexed
                ));
            }
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Indexing failed: {}", e));
            Err(e.into())
        }
    }
}
