//! Documentation Transform
//!
//! The walk that orchestrates the pipeline per declaration: decide
//! whether a docstring is needed, generate, style, and splice. Each
//! declaration is independent; a failure leaves its node untouched and
//! never aborts the walk.
//!
//! ## Ordering
//!
//! Declarations are visited post-order. A parent's prompt is rendered
//! with the edits of its nested declarations already applied, so the
//! provider sees children documented.

pub mod formatter;
pub mod rewriter;

pub use formatter::DocstringFormatter;
pub use rewriter::DeclarationRewriter;

use glob::Pattern;
use tracing::{debug, warn};

use crate::ai::SharedGenerator;
use crate::config::GenerationConfig;
use crate::syntax::{Declaration, EditSet, ParsedModule, TextEdit};
use crate::tracker::{DeclState, SharedTracker};
use crate::types::{DocweaveError, Result};

// =============================================================================
// Transform Outcome
// =============================================================================

/// Result of transforming one module.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    /// Rewritten source text (the original when nothing changed).
    pub code: String,

    /// Whether any declaration was rewritten.
    pub modified: bool,

    /// Declarations that finished as Processed.
    pub processed: usize,

    /// Declarations that finished as Failed.
    pub failed: usize,
}

// =============================================================================
// DocTransformer
// =============================================================================

/// Walks a module's declarations and splices in generated docstrings.
pub struct DocTransformer {
    generator: SharedGenerator,
    tracker: SharedTracker,
    formatter: DocstringFormatter,
    rewriter: DeclarationRewriter,
    ignore_patterns: Vec<Pattern>,
    overwrite: bool,
}

impl std::fmt::Debug for DocTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocTransformer")
            .field("formatter", &self.formatter)
            .field("rewriter", &self.rewriter)
            .field("ignore_patterns", &self.ignore_patterns)
            .field("overwrite", &self.overwrite)
            .finish_non_exhaustive()
    }
}

impl DocTransformer {
    pub fn new(
        generator: SharedGenerator,
        tracker: SharedTracker,
        config: &GenerationConfig,
        overwrite: bool,
    ) -> Result<Self> {
        let ignore_patterns = config
            .ignore_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    DocweaveError::Config(format!("Invalid ignore pattern '{}': {}", p, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            generator,
            tracker,
            formatter: DocstringFormatter::new(),
            rewriter: DeclarationRewriter::new(overwrite),
            ignore_patterns,
            overwrite,
        })
    }

    /// Transform every declaration of `module` and return the rewritten
    /// text. At most one generation request is in flight at any time;
    /// the walk awaits each declaration before moving on.
    pub async fn transform(&self, module: &ParsedModule) -> TransformOutcome {
        let scope = module.path();
        let mut edits = EditSet::new();
        let mut processed = 0usize;
        let mut failed = 0usize;

        for decl in module.declarations() {
            let id = decl.id();
            self.tracker
                .track(scope, id.clone(), decl.kind, DeclState::Pending);

            if self.is_ignored(&decl.name) {
                debug!("Skipping {} (ignore pattern)", decl.qualified_name);
                self.tracker
                    .track(scope, id, decl.kind, DeclState::Processed);
                processed += 1;
                continue;
            }

            if !self.overwrite && decl.has_doc() {
                self.tracker
                    .track(scope, id, decl.kind, DeclState::Processed);
                processed += 1;
                continue;
            }

            match self.document_declaration(module, &edits, &decl).await {
                Ok(Some(edit)) => {
                    edits.add(edit);
                    self.tracker
                        .track(scope, id, decl.kind, DeclState::Processed);
                    processed += 1;
                }
                Ok(None) => {
                    self.tracker
                        .track(scope, id, decl.kind, DeclState::Processed);
                    processed += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to document {} in {}: {}",
                        decl.qualified_name, scope, e
                    );
                    self.tracker.track(scope, id, decl.kind, DeclState::Failed);
                    failed += 1;
                }
            }
        }

        let modified = !edits.is_empty();
        let code = if modified {
            edits.apply(module.source())
        } else {
            module.source().to_string()
        };

        TransformOutcome {
            code,
            modified,
            processed,
            failed,
        }
    }

    /// Generate, style, and build the splice edit for one declaration.
    async fn document_declaration(
        &self,
        module: &ParsedModule,
        edits: &EditSet,
        decl: &Declaration,
    ) -> Result<Option<TextEdit>> {
        let source = edits.render_span(module.source(), decl.span.clone());
        let context = decl
            .enclosing_class
            .as_ref()
            .map(|name| format!("Class: {}", name));

        let text = self.generator.generate(&source, context.as_deref()).await?;
        let styled = self
            .formatter
            .format(&text, decl.doc_raw.as_deref(), self.overwrite);

        Ok(self.rewriter.rewrite(decl, &styled))
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore_patterns.iter().any(|p| p.matches(name))
    }
}

// =============================================================================
// Tests
// =============================================================================
