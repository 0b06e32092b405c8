//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Maskot Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    // External tools (both are optional features)
    println!("{}", style("External Tools").bold());
    let tool_checks = vec![
        check_tool(
            "pdftotext",
            "PDF ingestion unavailable",
            "Install poppler-utils (apt install poppler-utils / brew install poppler)",
        ),
        check_tool(
            "ffmpeg",
            "Microphone capture unavailable",
            "Install ffmpeg (apt install ffmpeg / brew install ffmpeg)",
        ),
    ];
    for check in &tool_checks {
        check.print();
    }
    checks.extend(tool_checks);

    println!();

    // API key
    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key();
    api_check.print();
    checks.push(api_check);

    println!();

    // Knowledge base and index
    println!("{}", style("Knowledge Base").bold());
    let kb_checks = check_knowledge_base(settings);
    for check in &kb_checks {
        check.print();
    }
    checks.extend(kb_checks);

    println!();

    // Configuration file
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Maskot.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Maskot is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available. Missing tools are warnings, since
/// each only gates one optional feature.
fn check_tool(name: &str, missing_msg: &str, hint: &str) -> CheckResult {
    let version_arg = if name == "ffmpeg" { "-version" } else { "-v" };

    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() || name == "pdftotext" => {
            // pdftotext -v prints the version but exits nonzero
            let text = if output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).to_string()
            } else {
                String::from_utf8_lossy(&output.stdout).to_string()
            };
            let version = text.lines().next().unwrap_or("installed").trim().to_string();
            let version = if version.len() > 60 {
                format!("{}...", &version[..60])
            } else {
                version
            };
            CheckResult::ok(name, &version)
        }
        Ok(_) => CheckResult::warning(name, missing_msg, hint),
        Err(_) => CheckResult::warning(name, missing_msg, hint),
    }
}

/// Check if the OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    if crate::openai::is_api_key_configured() {
        CheckResult::ok("OPENAI_API_KEY", "configured")
    } else {
        CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "export OPENAI_API_KEY='sk-...' (required for embeddings, answers, and speech)",
        )
    }
}

/// Check the knowledge base folder and index file.
fn check_knowledge_base(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let kb_dir = settings.knowledge_base_dir();
    if kb_dir.is_dir() {
        let count = std::fs::read_dir(&kb_dir)
            .map(|entries| entries.filter_map(|e| e.ok()).filter(|e| e.path().is_file()).count())
            .unwrap_or(0);
        if count == 0 {
            results.push(CheckResult::warning(
                "knowledge base",
                &format!("{} is empty", kb_dir.display()),
                "Add .txt, .md, or .pdf files before running 'maskot index'",
            ));
        } else {
            results.push(CheckResult::ok(
                "knowledge base",
                &format!("{} ({} files)", kb_dir.display(), count),
            ));
        }
    } else {
        results.push(CheckResult::warning(
            "knowledge base",
            &format!("{} does not exist", kb_dir.display()),
            "Run 'maskot init' or set knowledge_base.dir in the config",
        ));
    }

    let index_path = settings.sqlite_path();
    if index_path.exists() {
        results.push(CheckResult::ok(
            "vector index",
            &format!("{}", index_path.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "vector index",
            "not built yet",
            "Run 'maskot index' (or it will be built on first use)",
        ));
    }

    results
}

/// Check whether a configuration file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "config file",
            "not found (using defaults)",
            "Run 'maskot init' to create one",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_constructors() {
        let ok = CheckResult::ok("thing", "fine");
        assert_eq!(ok.status, CheckStatus::Ok);
        assert!(ok.hint.is_none());

        let warn = CheckResult::warning("thing", "meh", "do this");
        assert_eq!(warn.status, CheckStatus::Warning);
        assert_eq!(warn.hint.as_deref(), Some("do this"));
    }
}
