//! Declaration Rewriting
//!
//! Produces the byte-span edit that splices a styled docstring into a
//! declaration body: insertion in front of the first statement, or
//! replacement of the existing leading documentation run when
//! overwriting.

use crate::syntax::{Declaration, TextEdit};

/// Builds splice edits for one walk's overwrite policy.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationRewriter {
    overwrite: bool,
}

impl DeclarationRewriter {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }

    /// The edit that documents `decl` with `styled`, or `None` when the
    /// declaration already has documentation and overwrite is off.
    ///
    /// The result body always has exactly one leading documentation
    /// statement; the relative order of all other statements is
    /// untouched.
    pub fn rewrite(&self, decl: &Declaration, styled: &str) -> Option<TextEdit> {
        if decl.has_doc() {
            if !self.overwrite {
                return None;
            }
            // Replace the whole leading run with one statement. Spans
            // are in source order, so first start to last end covers it.
            let start = decl.leading_doc_spans[0].start;
            let end = decl.leading_doc_spans[decl.leading_doc_spans.len() - 1].end;
            return Some(TextEdit::replace(start..end, styled));
        }

        let edit = if decl.inline_suite {
            // `def f(): pass` keeps its suite on one line; the docstring
            // joins it as the first simple statement.
            TextEdit::insert(decl.first_statement_start, format!("{styled}; "))
        } else {
            TextEdit::insert(
                decl.first_statement_start,
                format!("{styled}\n{}", decl.body_indent),
            )
        };
        Some(edit)
    }
}

// =============================================================================
// Tests
// =============================================================================
