//! Docweave - AI-Powered Docstring Generation for Python
//!
//! A command-line tool that parses Python sources, finds functions and
//! classes without docstrings, and fills them in using any
//! OpenAI-compatible LLM endpoint.
//!
//! ## Core Features
//!
//! - **Structural Edits**: tree-sitter parsing with byte-precise splices,
//!   so untouched code survives byte-for-byte
//! - **Post-Order Traversal**: inner declarations are documented before
//!   the declarations that contain them
//! - **Token Budget Guard**: prompts that cannot fit the model context
//!   are rejected before any network call
//! - **Response Sanitization**: ordered cleanup chain for markdown fences,
//!   leaked signatures, and delimiter noise
//! - **Provider Presets**: Ollama, OpenAI, Gemini, and DeepSeek endpoints
//!   behind one Chat Completions transport
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use docweave::{
//!     DocGenerator, DocTransformer, DocumentationService, FileSystemService,
//!     OpenAiCompatProvider, ShutdownFlag, create_shared_tracker,
//! };
//!
//! let provider = OpenAiCompatProvider::new(&config.api, &config.generation.model)?;
//! let generator = Arc::new(DocGenerator::new(Arc::new(provider), &config.generation));
//! let transformer =
//!     DocTransformer::new(generator, create_shared_tracker(), &config.generation, false)?;
//! let service = DocumentationService::new(transformer, FileSystemService::new(), false);
//! let summary = service.process_paths(&paths, &ShutdownFlag::new()).await;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider transport, prompts, token budget, response sanitizing
//! - [`syntax`]: tree-sitter parsing and the byte-offset edit model
//! - [`transform`]: docstring formatting and per-file rewriting
//! - [`config`]: presets, config files, and CLI override resolution
//! - [`service`]: the sequential per-file driver

pub mod ai;
pub mod config;
pub mod constants;
pub mod fs;
pub mod service;
pub mod syntax;
pub mod tracker;
pub mod transform;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{
    ApiConfig, ConfigOverrides, ConfigurationManager, DocweaveConfig, GenerationConfig,
    PresetRegistry,
};

// Error Types
pub use types::{DeclId, DeclKind, DocweaveError, Result};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use fs::FileSystemService;
pub use service::{DocumentationService, RunSummary, ShutdownFlag};
pub use transform::{DocTransformer, TransformOutcome};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    // Generation
    DocGenerator,
    DocsGenerator,
    // Providers
    GenerationProvider,
    OpenAiCompatProvider,
    SharedGenerator,
    SharedProvider,
    // Budget
    TokenBudgetGuard,
};

// =============================================================================
// Syntax Re-exports
// =============================================================================

pub use syntax::{Declaration, EditSet, ParsedModule, TextEdit};
pub use tracker::{DeclState, ProgressTracker, SharedTracker, create_shared_tracker};
