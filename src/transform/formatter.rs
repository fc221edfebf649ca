//! Docstring Formatting
//!
//! Turns sanitized body text into a styled docstring literal: delimiter
//! choice (reusing the quote style of an overwritten docstring) plus the
//! fixed continuation indent.

use crate::constants::formatting::{ALT_DELIMITER, DEFAULT_DELIMITER, INDENT_WIDTH};

/// Styles docstring text for splicing into a declaration body.
#[derive(Debug, Clone)]
pub struct DocstringFormatter {
    indent_width: usize,
}

impl DocstringFormatter {
    pub fn new() -> Self {
        Self {
            indent_width: INDENT_WIDTH,
        }
    }

    pub fn with_indent_width(indent_width: usize) -> Self {
        Self { indent_width }
    }

    /// Produce `<delim>\n<text>\n<delim>` with every line after the
    /// first indented by the configured width. Whitespace-only lines
    /// pass through untouched so no trailing whitespace is introduced.
    ///
    /// `existing_doc` is the raw token of the docstring being replaced,
    /// if any; its quote style is reused when overwriting.
    pub fn format(&self, text: &str, existing_doc: Option<&str>, overwrite: bool) -> String {
        let delimiter = self.delimiter(existing_doc, overwrite);
        let assembled = format!("{delimiter}\n{text}\n{delimiter}");
        let indent = " ".repeat(self.indent_width);

        let lines: Vec<String> = assembled
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 || line.trim().is_empty() {
                    line.to_string()
                } else {
                    format!("{indent}{line}")
                }
            })
            .collect();

        lines.join("\n")
    }

    fn delimiter(&self, existing_doc: Option<&str>, overwrite: bool) -> &'static str {
        if overwrite
            && let Some(raw) = existing_doc
            && raw.starts_with(ALT_DELIMITER)
        {
            return ALT_DELIMITER;
        }
        DEFAULT_DELIMITER
    }
}

impl Default for DocstringFormatter {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
