//! Response Sanitization
//!
//! Cleans raw model output into plain docstring text. Handles the common
//! ways models wrap an answer:
//! - Markdown code fences around the whole response
//! - The declaration signature echoed back with its body
//! - The docstring returned inside triple quotes
//!
//! Steps run in order over the text. A fail-silent step that errors
//! passes its input through unchanged; a strict step that errors aborts
//! the chain with a step-indexed error.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{DocweaveError, Result};

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^```(?:\w+)?\s*\n|\n```(?:\w+)?\s*$").expect("fence pattern must compile")
});

static DOUBLE_QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"(?s)"""(.*?)""""##).expect("double-quote pattern must compile")
});

static SINGLE_QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)'''(.*?)'''").expect("single-quote pattern must compile")
});

// =============================================================================
// Steps
// =============================================================================

/// How a failing step affects the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Failure aborts sanitization of this response.
    Strict,
    /// Failure is logged and the input passes through unchanged.
    FailSilent,
}

type StepFn = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// One named transformation in a sanitizer chain.
pub struct SanitizerStep {
    name: String,
    policy: StepPolicy,
    run: StepFn,
}

impl SanitizerStep {
    pub fn strict(
        name: impl Into<String>,
        run: impl Fn(&str) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            policy: StepPolicy::Strict,
            run: Box::new(run),
        }
    }

    pub fn fail_silent(
        name: impl Into<String>,
        run: impl Fn(&str) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            policy: StepPolicy::FailSilent,
            run: Box::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> StepPolicy {
        self.policy
    }
}

// =============================================================================
// Chain
// =============================================================================

/// Ordered pipeline of sanitizer steps.
#[derive(Default)]
pub struct SanitizerChain {
    steps: Vec<SanitizerStep>,
}

impl SanitizerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, step: SanitizerStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the chain over a raw response.
    pub fn sanitize(&self, raw: &str) -> Result<String> {
        let mut text = raw.to_string();

        for (index, step) in self.steps.iter().enumerate() {
            match (step.run)(&text) {
                Ok(cleaned) => text = cleaned,
                Err(cause) => match step.policy {
                    StepPolicy::FailSilent => {
                        debug!(
                            "Sanitizer step {} ({}) failed, passing input through: {}",
                            index, step.name, cause
                        );
                    }
                    StepPolicy::Strict => {
                        return Err(DocweaveError::Sanitizer {
                            index,
                            name: step.name.clone(),
                            cause: cause.to_string(),
                        });
                    }
                },
            }
        }

        Ok(text)
    }
}

/// The standard chain applied to every generated docstring.
pub fn default_chain() -> SanitizerChain {
    SanitizerChain::new()
        .with_step(SanitizerStep::strict("trim", |s| Ok(s.trim().to_string())))
        .with_step(SanitizerStep::fail_silent("remove_markdown_fences", |s| {
            Ok(remove_markdown_fences(s))
        }))
        .with_step(SanitizerStep::fail_silent("remove_leaked_signature", |s| {
            Ok(remove_leaked_signature(s))
        }))
        .with_step(SanitizerStep::strict("extract_docstring_content", |s| {
            Ok(extract_docstring_content(s))
        }))
        .with_step(SanitizerStep::strict("trim", |s| Ok(s.trim().to_string())))
}

// =============================================================================
// Built-in Transformations
// =============================================================================

/// Remove markdown code fences from the response.
pub fn remove_markdown_fences(response: &str) -> String {
    FENCE_RE.replace_all(response, "").into_owned()
}

/// Remove a declaration signature echoed at the start of the response,
/// along with its indented body.
///
/// Removal stops before any line containing a triple quote so an echoed
/// function that still carries its docstring keeps it for the extraction
/// step.
pub fn remove_leaked_signature(response: &str) -> String {
    let lines: Vec<&str> = response.lines().collect();
    let Some(first_idx) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return response.to_string();
    };

    if !is_signature_line(lines[first_idx]) {
        return response.to_string();
    }
    let signature_indent = indent_width(lines[first_idx]);

    let mut end = first_idx + 1;
    while end < lines.len() {
        let line = lines[end];
        if line.contains("\"\"\"") || line.contains("'''") {
            break;
        }
        if !line.trim().is_empty() && indent_width(line) <= signature_indent {
            break;
        }
        end += 1;
    }

    let mut kept: Vec<&str> = lines[..first_idx].to_vec();
    kept.extend(&lines[end..]);
    kept.join("\n")
}

/// Extract the content between the first matched pair of triple quotes.
/// Text without a complete pair passes through unchanged.
pub fn extract_docstring_content(response: &str) -> String {
    let double = DOUBLE_QUOTED_RE.captures(response);
    let single = SINGLE_QUOTED_RE.captures(response);

    let chosen = match (double, single) {
        (Some(d), Some(s)) => {
            // Earliest opener wins when both styles appear
            let d_start = d.get(0).map_or(usize::MAX, |m| m.start());
            let s_start = s.get(0).map_or(usize::MAX, |m| m.start());
            if d_start <= s_start { d } else { s }
        }
        (Some(d), None) => d,
        (None, Some(s)) => s,
        (None, None) => return response.to_string(),
    };

    match chosen.get(1) {
        Some(doc) => doc.as_str().to_string(),
        None => response.to_string(),
    }
}

fn is_signature_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    let trimmed = trimmed.strip_prefix("async ").unwrap_or(trimmed);
    (trimmed.starts_with("def ") || trimmed.starts_with("class "))
        && trimmed.trim_end().ends_with(':')
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
