//! CLI module for Maskot.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Maskot - Retrieval-augmented tutor with a talking mascot
///
/// Indexes a folder of study material, answers questions about it with an
/// LLM, and tags each answer with an emotion for the mascot front end.
#[derive(Parser, Debug)]
#[command(name = "maskot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Maskot and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Build the vector index from the knowledge base folder
    Index {
        /// Wipe and rebuild the index even if it already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Ask a question and get an answer from the knowledge base
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Show the retrieved source chunks
        #[arg(short, long)]
        sources: bool,
    },

    /// Start an interactive chat session
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start the HTTP API server for the mascot front end
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Synthesize text to speech
    Speak {
        /// The text to speak
        text: String,

        /// Write the MP3 here instead of a temp file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record from the microphone and transcribe
    Listen {
        /// Transcribe this audio file instead of recording
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Recording duration in seconds (overrides config)
        #[arg(short, long)]
        duration: Option<u32>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
