//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Maskot Setup");
    println!();
    println!("Welcome to Maskot! Let's make sure everything is configured correctly.\n");

    // Step 1: Check API key
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    if !crate::openai::is_api_key_configured() {
        Output::warning("OPENAI_API_KEY environment variable is not set.");
        println!();
        println!("  Maskot requires an OpenAI API key for embeddings, answers, and speech.");
        println!("  Get your API key from: {}", style("https://platform.openai.com/api-keys").underlined());
        println!();
        println!("  Set it in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'maskot init' again.");
            return Ok(());
        }
    } else {
        Output::success("OpenAI API key is configured!");
    }

    println!();

    // Step 2: Create directories
    println!("{}", style("Step 2: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    let temp_dir = settings.temp_dir();
    let kb_dir = settings.knowledge_base_dir();

    for dir in [&data_dir, &temp_dir] {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            Output::success(&format!("Created directory: {}", dir.display()));
        } else {
            Output::info(&format!("Directory exists: {}", dir.display()));
        }
    }

    if !kb_dir.exists() {
        if prompt_continue(&format!("Create knowledge base folder at {}?", kb_dir.display()))? {
            std::fs::create_dir_all(&kb_dir)?;
            Output::success(&format!("Created knowledge base folder: {}", kb_dir.display()));
        } else {
            Output::warning("Skipped. Put your study material somewhere and set knowledge_base.dir.");
        }
    } else {
        Output::info(&format!("Knowledge base folder exists: {}", kb_dir.display()));
    }

    println!();

    // Step 3: Create config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("maskot doctor").cyan());
    println!("  {} Put .txt/.md/.pdf files in the knowledge base folder", style("(add material)").dim());
    println!("  {} Build the index", style("maskot index").cyan());
    println!("  {} Ask your first question", style("maskot ask \"<question>\"").cyan());
    println!("  {} Start the API for the mascot front end", style("maskot serve").cyan());
    println!();
    println!("For more help: {}", style("maskot --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}
