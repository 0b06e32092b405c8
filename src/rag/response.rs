//! Answer generation from retrieved context.

use super::{context::format_context_for_prompt, ContextChunk};
use crate::config::Prompts;
use crate::error::{MaskotError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Fallback answer when retrieval produced no context at all.
pub const NO_CONTEXT_FALLBACK: &str = "Sorry, no relevant information found.";

/// Generates tutor answers from a question and its retrieved context.
pub struct AnswerGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompts: Prompts,
    max_answer_tokens: u32,
    temperature: f32,
}

impl AnswerGenerator {
    /// Create a generator for the given model.
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            prompts: Prompts::default(),
            max_answer_tokens: 200,
            temperature: 0.0,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Bound the generated answer length, in tokens.
    pub fn with_max_answer_tokens(mut self, max_tokens: u32) -> Self {
        self.max_answer_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Generate an answer for a question given its retrieved context.
    ///
    /// Short-circuits with [`NO_CONTEXT_FALLBACK`] when there is no context;
    /// the model is only asked when there is something to ground the answer.
    #[instrument(skip(self, context), fields(question = %question, chunks = context.len()))]
    pub async fn generate(&self, question: &str, context: &[ContextChunk]) -> Result<String> {
        if context.is_empty() {
            debug!("No context retrieved; returning fallback answer");
            return Ok(NO_CONTEXT_FALLBACK.to_string());
        }

        let context_text = format_context_for_prompt(context);

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context_text);

        let user_prompt = self.prompts.render_with_custom(&self.prompts.tutor.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.tutor.system.clone())
                .build()
                .map_err(|e| MaskotError::Rag(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| MaskotError::Rag(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_answer_tokens)
            .build()
            .map_err(|e| MaskotError::Rag(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| MaskotError::OpenAI(format!("Failed to generate answer: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| MaskotError::Rag("Empty response from LLM".to_string()))?
            .trim()
            .to_string();

        debug!("Generated answer from {} chunks", context.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_context_short_circuits() {
        // No API call happens when the context is empty, so this runs offline
        let generator = AnswerGenerator::new("gpt-4o-mini");
        let answer = generator.generate("What is gravity?", &[]).await.unwrap();
        assert_eq!(answer, NO_CONTEXT_FALLBACK);
    }

    #[test]
    fn test_builder_knobs() {
        let generator = AnswerGenerator::new("gpt-4o-mini")
            .with_max_answer_tokens(120)
            .with_temperature(0.5);
        assert_eq!(generator.max_answer_tokens, 120);
        assert!((generator.temperature - 0.5).abs() < f32::EPSILON);
    }
}
