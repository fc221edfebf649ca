//! Byte-Span Edits
//!
//! Rewrites are collected as byte-range replacements against the original
//! source and applied in a single pass. A declaration that contributes no
//! edits is reproduced byte-identically, which makes the
//! unchanged-on-failure and idempotence guarantees structural rather than
//! something each caller has to re-establish.

use std::ops::Range;

use tracing::warn;

// ============================================================================
// TextEdit
// ============================================================================

/// One replacement of a byte range with new text.
///
/// Insertions use an empty range (`start == end`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
}

impl TextEdit {
    /// Replace the bytes in `range` with `text`.
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Insert `text` at byte offset `at` without removing anything.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: at..at,
            text: text.into(),
        }
    }
}

// ============================================================================
// EditSet
// ============================================================================

/// Collection of edits against one source text.
///
/// Edits may be added in any order; application sorts them by start
/// offset. Edits are expected to be disjoint (the walk touches each
/// declaration's docstring region once). An edit overlapping an earlier
/// one is skipped with a warning rather than producing garbled output.
#[derive(Debug, Default)]
pub struct EditSet {
    edits: Vec<TextEdit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply every edit to `source` and return the rewritten text.
    pub fn apply(&self, source: &str) -> String {
        let mut ordered: Vec<&TextEdit> = self.edits.iter().collect();
        ordered.sort_by_key(|e| (e.range.start, e.range.end));
        splice(source, 0, &ordered)
    }

    /// Render the slice `span` of `source` with the edits that fall
    /// entirely inside it applied.
    ///
    /// Used when a parent declaration is printed for prompting after its
    /// nested declarations have already been rewritten.
    pub fn render_span(&self, source: &str, span: Range<usize>) -> String {
        let mut contained: Vec<&TextEdit> = self
            .edits
            .iter()
            .filter(|e| e.range.start >= span.start && e.range.end <= span.end)
            .collect();
        contained.sort_by_key(|e| (e.range.start, e.range.end));
        splice(&source[span.clone()], span.start, &contained)
    }
}

/// Splice `ordered` edits into `source`, where edit offsets are absolute
/// and `base` is the absolute offset of `source`'s first byte.
fn splice(source: &str, base: usize, ordered: &[&TextEdit]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;

    for edit in ordered {
        let start = edit.range.start - base;
        let end = edit.range.end - base;
        if start < cursor {
            warn!(
                "Skipping overlapping edit at {}..{}",
                edit.range.start, edit.range.end
            );
            continue;
        }
        out.push_str(&source[cursor..start]);
        out.push_str(&edit.text);
        cursor = end;
    }

    out.push_str(&source[cursor..]);
    out
}

// ============================================================================
// Tests
// ============================================================================
