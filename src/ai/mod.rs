//! AI Generation Layer
//!
//! Provides LLM-backed docstring generation: prompt assembly, context
//! budget enforcement, provider transport, and response sanitization.

pub mod budget;
pub mod generator;
pub mod prompt;
pub mod provider;
pub mod sanitize;
pub mod tokenizer;

pub use budget::{BudgetAllowance, TokenBudgetGuard};
pub use generator::{DocGenerator, DocsGenerator, SharedGenerator};
pub use prompt::PromptBuilder;
pub use provider::{CompletionRequest, GenerationProvider, OpenAiCompatProvider, SharedProvider};
pub use sanitize::{
    SanitizerChain, SanitizerStep, StepPolicy, default_chain, extract_docstring_content,
    remove_leaked_signature, remove_markdown_fences,
};
pub use tokenizer::{TokenCounter, TokenEstimator};
