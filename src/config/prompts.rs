//! Prompt templates for Maskot.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub tutor: TutorPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for tutor answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorPrompts {
    pub system: String,
    pub user: String,
}

impl Default for TutorPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an AI tutor. Use the provided context to answer the user's question.

Guidelines:
- Keep your answer concise and clear (max 4-5 sentences)
- Answer using only the provided context
- If you cannot find the answer in the context, say exactly:
  "Sorry, I couldn't find relevant information.""#
                .to_string(),

            user: r#"Question: {{question}}

Context:
{{context}}

Answer:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let tutor_path = custom_path.join("tutor.toml");
            if tutor_path.exists() {
                let content = std::fs::read_to_string(&tutor_path)?;
                prompts.tutor = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.tutor.system.contains("AI tutor"));
        assert!(prompts.tutor.user.contains("{{question}}"));
        assert!(prompts.tutor.user.contains("{{context}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Question: {{question}}\nContext: {{context}}";
        let mut vars = std::collections::HashMap::new();
        vars.insert("question".to_string(), "What is recursion?".to_string());
        vars.insert("context".to_string(), "recursion is...".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Question: What is recursion?\nContext: recursion is...");
    }

    #[test]
    fn test_custom_variables_yield_to_call_site() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("question".to_string(), "from config".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("question".to_string(), "from call".to_string());

        let result = prompts.render_with_custom("{{question}}", &vars);
        assert_eq!(result, "from call");
    }
}
