//! Shared OpenAI client setup.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Timeout applied to every OpenAI request (2 minutes).
///
/// Answers are capped at 200 tokens and speech clips are short, so anything
/// slower than this is a hung connection.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Create an OpenAI client with the standard request timeout.
pub fn create_client() -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}

/// Check whether an OpenAI API key is present in the environment.
pub fn is_api_key_configured() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok_and(|key| !key.is_empty())
}
