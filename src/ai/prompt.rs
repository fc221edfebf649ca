//! Prompt Construction
//!
//! Builds the two halves of every generation request:
//! - User prompt: the declaration source in a fenced code block, plus
//!   optional call-site context
//! - System prompt: the writer role, fixed system constraints, and the
//!   user-configured constraint list rendered verbatim
//!
//! The user prompt is capped at a character limit. An oversized prompt is
//! trimmed and sent, not rejected; the token budget check happens later in
//! `budget`.

use tracing::warn;

use crate::config::GenerationConfig;

/// Fixed preamble of the system prompt. User constraints are appended
/// under their own heading.
const SYSTEM_SCAFFOLD: &str = "You're a professional documentation writer.

You'll be provided with a function/class sourcecode to document.
The user will likely provide a format, stick to it.

You're only to respond within the constraints below.

System constraints:
1. You keep it short, precise and accurate.
2. You don't ask questions.
3. You don't make any assumptions. You use only the facts you're provided.
4. Don't respond with the docstring quotes.
5. Respond in Sphinx docstring format if the user doesn't provide a format.

User constraints:
";

const SYSTEM_CLOSING: &str = "

Anything that doesn't match the constraints should be rejected explicitly and mention exactly which constraint was violated.";

/// Assembles prompts for one configured generation run.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    constraints: Vec<String>,
    char_limit: usize,
}

impl PromptBuilder {
    pub fn new(constraints: Vec<String>, char_limit: usize) -> Self {
        Self {
            constraints,
            char_limit,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.constraints.clone(), config.prompt_char_limit)
    }

    /// Build the user half of the prompt.
    ///
    /// The source lands in a ```python fence with surrounding whitespace
    /// trimmed. Context, when present and non-empty, follows on its own
    /// line. The result is capped at the configured character limit.
    pub fn user_prompt(&self, source: &str, context: Option<&str>) -> String {
        let mut lines = vec![
            "```python".to_string(),
            source.trim().to_string(),
            "```".to_string(),
        ];

        if let Some(ctx) = context.filter(|c| !c.is_empty()) {
            lines.push(format!("Additional context: {ctx}"));
        }

        let prompt = lines.join("\n");
        self.trim_to_limit(prompt)
    }

    /// Build the system half of the prompt. Constraint strings are joined
    /// with newlines, untouched.
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::from(SYSTEM_SCAFFOLD);
        prompt.push_str(&self.constraints.join("\n"));
        prompt.push_str(SYSTEM_CLOSING);
        prompt
    }

    fn trim_to_limit(&self, prompt: String) -> String {
        let total_chars = prompt.chars().count();
        if total_chars <= self.char_limit {
            return prompt;
        }

        let trimmed: String = prompt.chars().take(self.char_limit).collect();
        warn!(
            "Prompt was trimmed from {} to {} characters to fit context window",
            total_chars, self.char_limit
        );
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PromptBuilder {
        PromptBuilder::new(vec!["Keep examples minimal".to_string()], 10_000)
    }

    #[test]
    fn test_user_prompt_fences_source() {
        let prompt = builder().user_prompt("  def f():\n    pass\n", None);
        assert_eq!(prompt, "```python\ndef f():\n    pass\n```");
    }

    #[test]
    fn test_user_prompt_appends_context() {
        let prompt = builder().user_prompt("def f(): pass", Some("Class: Widget"));
        assert!(prompt.ends_with("```\nAdditional context: Class: Widget"));
    }

    #[test]
    fn test_user_prompt_skips_empty_context() {
        let prompt = builder().user_prompt("def f(): pass", Some(""));
        assert!(!prompt.contains("Additional context"));
    }

    #[test]
    fn test_user_prompt_trimmed_to_char_limit() {
        let builder = PromptBuilder::new(vec![], 50);
        let source = "x = 1\n".repeat(100);

        let prompt = builder.user_prompt(&source, None);
        assert_eq!(prompt.chars().count(), 50);
        assert!(prompt.starts_with("```python\n"));
    }

    #[test]
    fn test_char_limit_counts_chars_not_bytes() {
        let builder = PromptBuilder::new(vec![], 30);
        let source = "s = 'héllo wörld'\n".repeat(20);

        let prompt = builder.user_prompt(&source, None);
        // Must not panic on a multibyte boundary
        assert_eq!(prompt.chars().count(), 30);
    }

    #[test]
    fn test_system_prompt_contains_fixed_constraints() {
        let system = builder().system_prompt();
        assert!(system.contains("professional documentation writer"));
        assert!(system.contains("1. You keep it short, precise and accurate."));
        assert!(system.contains("5. Respond in Sphinx docstring format"));
    }

    #[test]
    fn test_system_prompt_renders_user_constraints_verbatim() {
        let builder = PromptBuilder::new(
            vec!["First rule".to_string(), "Second rule".to_string()],
            10_000,
        );
        let system = builder.system_prompt();
        assert!(system.contains("User constraints:\nFirst rule\nSecond rule"));
    }
}
