//! Docstring Generation Pipeline
//!
//! Wires prompt construction, budget enforcement, the provider call,
//! and response sanitization into a single per-declaration operation.
//!
//! ## Flow
//!
//! 1. Reject empty source before any prompt work.
//! 2. Build the user and system prompts.
//! 3. Check the combined prompt against the context budget.
//! 4. Request a completion capped at the remaining response tokens.
//! 5. Run the raw response through the sanitizer chain.

use async_trait::async_trait;
use tracing::{debug, error};

use crate::ai::budget::TokenBudgetGuard;
use crate::ai::prompt::PromptBuilder;
use crate::ai::provider::{CompletionRequest, SharedProvider};
use crate::ai::sanitize::{SanitizerChain, default_chain};
use crate::config::GenerationConfig;
use crate::constants::generation::TEMPERATURE;
use crate::types::{DocweaveError, Result};

// ============================================================================
// Generator Trait
// ============================================================================

/// Docstring generation seam used by the transformer.
///
/// Implementations take the source of one declaration plus optional
/// surrounding context and return docstring body text ready for styling.
#[async_trait]
pub trait DocsGenerator: Send + Sync {
    /// Generate a docstring for one declaration's source.
    async fn generate(&self, source: &str, context: Option<&str>) -> Result<String>;
}

/// Shared generator handle handed to the transformer.
pub type SharedGenerator = std::sync::Arc<dyn DocsGenerator>;

// ============================================================================
// Standard Pipeline
// ============================================================================

/// Standard generation pipeline backed by a completion provider.
pub struct DocGenerator {
    provider: SharedProvider,
    prompts: PromptBuilder,
    budget: TokenBudgetGuard,
    sanitizer: SanitizerChain,
}

impl DocGenerator {
    /// Create a generator from a provider and generation settings.
    pub fn new(provider: SharedProvider, config: &GenerationConfig) -> Self {
        Self {
            provider,
            prompts: PromptBuilder::from_config(config),
            budget: TokenBudgetGuard::new(config.max_context),
            sanitizer: default_chain(),
        }
    }

    /// Replace the default sanitizer chain.
    pub fn with_sanitizer(mut self, sanitizer: SanitizerChain) -> Self {
        self.sanitizer = sanitizer;
        self
    }
}

#[async_trait]
impl DocsGenerator for DocGenerator {
    async fn generate(&self, source: &str, context: Option<&str>) -> Result<String> {
        if source.trim().is_empty() {
            return Err(DocweaveError::generation("source cannot be empty"));
        }

        let user = self.prompts.user_prompt(source, context);
        let system = self.prompts.system_prompt();

        // Budget failures surface as-is so callers can distinguish an
        // oversized declaration from a provider fault.
        let allowance = self.budget.check(&system, &user)?;

        let request = CompletionRequest {
            system,
            user,
            max_tokens: allowance.response_tokens,
            temperature: TEMPERATURE,
        };

        let raw = match self.provider.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Documentation generation failed: {}", e);
                return Err(DocweaveError::Generation(e.to_string()));
            }
        };

        debug!(
            "Received {} chars from provider '{}'",
            raw.len(),
            self.provider.name()
        );

        self.sanitizer.sanitize(&raw)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ai::provider::GenerationProvider;

    struct StubProvider {
        response: std::result::Result<String, String>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn ok(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn err(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationProvider for StubProvider {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(DocweaveError::Provider(message.clone())),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    fn test_config() -> GenerationConfig {
        GenerationConfig {
            model: "test-model".to_string(),
            max_context: 16384,
            constraints: vec!["Keep it short".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_generate_sanitizes_provider_response() {
        let stub = Arc::new(StubProvider::ok(
            "```plaintext\n\"\"\"Adds two numbers.\"\"\"\n```",
        ));
        let generator = DocGenerator::new(stub.clone(), &test_config());

        let result = generator
            .generate("def add(a, b):\n    return a + b", None)
            .await
            .unwrap();

        assert_eq!(result, "Adds two numbers.");
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_passes_context_through() {
        let stub = Arc::new(StubProvider::ok("Returns the item count."));
        let generator = DocGenerator::new(stub.clone(), &test_config());

        let result = generator
            .generate("def count(self):\n    return len(self.items)", Some("Class: Basket"))
            .await
            .unwrap();

        assert_eq!(result, "Returns the item count.");
    }

    #[tokio::test]
    async fn test_empty_source_rejected_without_provider_call() {
        let stub = Arc::new(StubProvider::ok("unused"));
        let generator = DocGenerator::new(stub.clone(), &test_config());

        let err = generator.generate("   \n", None).await.unwrap_err();

        assert!(err.to_string().contains("source cannot be empty"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_budget_rejection_makes_no_provider_call() {
        let stub = Arc::new(StubProvider::ok("unused"));
        // Context window smaller than the response reserve leaves no room
        // for any prompt at all.
        let config = GenerationConfig {
            max_context: 5000,
            ..test_config()
        };
        let generator = DocGenerator::new(stub.clone(), &config);

        let err = generator
            .generate("def add(a, b):\n    return a + b", None)
            .await
            .unwrap_err();

        assert!(matches!(err, DocweaveError::BudgetExceeded { .. }));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_wrapped_as_generation_error() {
        let stub = Arc::new(StubProvider::err("API error (500): upstream down"));
        let generator = DocGenerator::new(stub.clone(), &test_config());

        let err = generator
            .generate("def add(a, b):\n    return a + b", None)
            .await
            .unwrap_err();

        assert!(matches!(err, DocweaveError::Generation(_)));
        assert!(err.to_string().contains("Documentation generation failed"));
        assert!(err.to_string().contains("upstream down"));
        assert_eq!(stub.call_count(), 1);
    }
}
