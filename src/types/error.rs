//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Levels
//!
//! - **Fatal**: configuration problems abort before any file is touched
//! - **File-level**: unreadable or unparsable files are reported and skipped
//! - **Declaration-level**: budget, provider, generation, and sanitizer
//!   failures are caught at the walk boundary and never escape one
//!   declaration
//!
//! ## Design Principles
//!
//! - Single unified error type (DocweaveError) for the entire application
//! - Structured error variants with context for better debugging
//! - No panic/unwrap - all errors are recoverable

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocweaveError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    // -------------------------------------------------------------------------
    // Startup Errors (fatal, abort before any file is touched)
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // File-level Errors
    // -------------------------------------------------------------------------
    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    // -------------------------------------------------------------------------
    // Declaration-level Errors
    // -------------------------------------------------------------------------
    /// Prompt would not leave room for a response. Raised before any
    /// network call is made.
    #[error("Prompt of {estimated} tokens exceeds budget of {limit} (context {max_context})")]
    BudgetExceeded {
        estimated: usize,
        limit: usize,
        max_context: usize,
    },

    /// Transport, auth, or model failure reported by the provider.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Generation pipeline failure. Provider errors are wrapped into this
    /// one level above the transport.
    #[error("Documentation generation failed: {0}")]
    Generation(String),

    /// A non-fail-silent sanitizer step failed.
    #[error("Sanitizer step {index} ({name}) failed: {cause}")]
    Sanitizer {
        index: usize,
        name: String,
        cause: String,
    },
}

pub type Result<T> = std::result::Result<T, DocweaveError>;

impl DocweaveError {
    /// True for failures the tree walk absorbs at one declaration.
    pub fn is_declaration_level(&self) -> bool {
        matches!(
            self,
            Self::BudgetExceeded { .. }
                | Self::Provider(_)
                | Self::Generation(_)
                | Self::Sanitizer { .. }
        )
    }

    /// Create a generation error that wraps a lower-level cause.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}

// =============================================================================
// Tests
// =============================================================================
