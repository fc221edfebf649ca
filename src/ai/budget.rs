//! Prompt Token Budgeting
//!
//! Hard limit enforcement for a single prompt against the model's
//! context window. The check runs before any network call: a prompt must
//! leave headroom for the response, and whatever the prompt does not use
//! becomes the response token ceiling.

use crate::ai::tokenizer::TokenCounter;
use crate::constants::generation::MIN_RESPONSE_RESERVE;
use crate::types::{DocweaveError, Result};

/// Outcome of a successful budget check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetAllowance {
    /// Estimated prompt size in tokens
    pub prompt_tokens: usize,
    /// Token ceiling for the model response
    pub response_tokens: usize,
}

/// Pre-flight budget check for one prompt pair.
pub struct TokenBudgetGuard {
    max_context: usize,
    counter: TokenCounter,
}

impl TokenBudgetGuard {
    pub fn new(max_context: usize) -> Self {
        Self {
            max_context,
            counter: TokenCounter::default(),
        }
    }

    pub fn with_counter(max_context: usize, counter: TokenCounter) -> Self {
        Self {
            max_context,
            counter,
        }
    }

    /// Check a system/user prompt pair against the context window.
    ///
    /// The estimate covers both halves plus the separators they are sent
    /// with. A rejected prompt never reaches the provider.
    pub fn check(&self, system: &str, user: &str) -> Result<BudgetAllowance> {
        let estimated = self.counter.count(&format!("{system}\n{user}\n"));
        let limit = self.max_context.saturating_sub(MIN_RESPONSE_RESERVE);

        if estimated > limit {
            return Err(DocweaveError::BudgetExceeded {
                estimated,
                limit,
                max_context: self.max_context,
            });
        }

        Ok(BudgetAllowance {
            prompt_tokens: estimated,
            response_tokens: self.max_context - estimated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_within_budget() {
        let guard = TokenBudgetGuard::new(16_384);
        let allowance = guard.check("system prompt", "def f(): pass").unwrap();

        assert!(allowance.prompt_tokens > 0);
        assert_eq!(
            allowance.response_tokens,
            16_384 - allowance.prompt_tokens
        );
    }

    #[test]
    fn test_prompt_exceeding_budget_is_rejected() {
        // Reserve swallows the whole window, so nothing fits
        let guard = TokenBudgetGuard::new(5_000);
        let err = guard.check("system", "user").unwrap_err();

        match err {
            DocweaveError::BudgetExceeded {
                limit, max_context, ..
            } => {
                assert_eq!(limit, 0);
                assert_eq!(max_context, 5_000);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_large_prompt_rejected_for_realistic_window() {
        let guard = TokenBudgetGuard::new(6_000);
        let big_source = "def f(x):\n    return x + 1\n".repeat(500);

        let err = guard.check("system", &big_source).unwrap_err();
        assert!(err.is_declaration_level());
    }

    #[test]
    fn test_response_ceiling_shrinks_with_prompt() {
        let guard = TokenBudgetGuard::new(16_384);
        let small = guard.check("s", "short").unwrap();
        let large = guard
            .check("s", &"def f(): pass\n".repeat(50))
            .unwrap();

        assert!(large.prompt_tokens > small.prompt_tokens);
        assert!(large.response_tokens < small.response_tokens);
    }
}
