//! Python Syntax Adapter
//!
//! Bridges tree-sitter's concrete syntax tree to the pipeline's model: a
//! parsed module plus a flat, post-order list of the declarations that can
//! carry docstrings.
//!
//! ## Docstring convention
//!
//! A declaration has documentation if, and only if, its first body
//! statement is an expression statement wrapping a single string literal.
//! Consecutive leading string statements are treated as one documentation
//! run for replacement purposes.

pub mod edit;

pub use edit::{EditSet, TextEdit};

use std::ops::Range;

use tracing::debug;
use tree_sitter::Node;

use crate::types::{DeclId, DeclKind, DocweaveError, Result};

// ============================================================================
// ParsedModule
// ============================================================================

/// One parsed Python source file.
///
/// Owns the source text and the tree. Rewrites never mutate the tree;
/// they are expressed as byte-span edits against `source` (see [`edit`]).
#[derive(Debug)]
pub struct ParsedModule {
    path: String,
    source: String,
    tree: tree_sitter::Tree,
}

impl ParsedModule {
    /// Parse `source` as Python. A module whose tree contains syntax
    /// errors is rejected; splicing text into a broken tree multiplies
    /// the damage.
    pub fn parse(path: &str, source: &str) -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| DocweaveError::Parse {
                message: format!("Failed to set Python language: {}", e),
                path: path.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| DocweaveError::Parse {
                message: "Failed to parse Python file".to_string(),
                path: path.to_string(),
            })?;

        if tree.root_node().has_error() {
            return Err(DocweaveError::Parse {
                message: "Source contains syntax errors".to_string(),
                path: path.to_string(),
            });
        }

        Ok(Self {
            path: path.to_string(),
            source: source.to_string(),
            tree,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Collect every function and class declaration in post-order:
    /// nested declarations precede the declaration that contains them,
    /// so by the time a parent is visited its children are resolved.
    pub fn declarations(&self) -> Vec<Declaration> {
        let mut out = Vec::new();
        let mut classes = Vec::new();
        collect_into(self.tree.root_node(), &self.source, &mut classes, &mut out);
        debug!("Collected {} declarations from {}", out.len(), self.path);
        out
    }
}

// ============================================================================
// Declaration
// ============================================================================

/// One function or class declaration, flattened out of the tree.
///
/// Byte spans index into the owning module's source text.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,

    /// Dotted path through enclosing classes, e.g. `Greeter.greet`.
    pub qualified_name: String,

    /// 1-based line of the `def`/`class` keyword.
    pub line: usize,

    /// Span to print when prompting; includes decorators when present.
    pub span: Range<usize>,

    /// Span of the body block.
    pub body_span: Range<usize>,

    /// Byte offset of the first body statement, where an inserted
    /// documentation statement goes.
    pub first_statement_start: usize,

    /// Leading whitespace of the first body line. Empty for inline
    /// suites.
    pub body_indent: String,

    /// Body shares the header's line (`def f(): pass`).
    pub inline_suite: bool,

    /// Innermost enclosing class, if any.
    pub enclosing_class: Option<String>,

    /// Spans of the leading run of string expression statements.
    pub leading_doc_spans: Vec<Range<usize>>,

    /// Raw token text of the first leading string, quotes included.
    pub doc_raw: Option<String>,
}

impl Declaration {
    /// Tracker identity for this declaration.
    pub fn id(&self) -> DeclId {
        DeclId::new(self.kind, &self.qualified_name, self.line)
    }

    pub fn has_doc(&self) -> bool {
        !self.leading_doc_spans.is_empty()
    }
}

// ============================================================================
// Collection Walk
// ============================================================================

fn collect_into(node: Node, source: &str, classes: &mut Vec<String>, out: &mut Vec<Declaration>) {
    match node.kind() {
        "function_definition" => {
            if let Some(body) = node.child_by_field_name("body") {
                collect_children(body, source, classes, out);
            }
            if let Some(decl) = build_declaration(node, DeclKind::Function, source, classes) {
                out.push(decl);
            }
        }
        "class_definition" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| get_node_text(n, source.as_bytes()).to_string())
                .filter(|n| !n.is_empty());

            if let Some(ref name) = name {
                classes.push(name.clone());
            }
            if let Some(body) = node.child_by_field_name("body") {
                collect_children(body, source, classes, out);
            }
            if name.is_some() {
                classes.pop();
            }

            if let Some(decl) = build_declaration(node, DeclKind::Class, source, classes) {
                out.push(decl);
            }
        }
        _ => collect_children(node, source, classes, out),
    }
}

fn collect_children(
    node: Node,
    source: &str,
    classes: &mut Vec<String>,
    out: &mut Vec<Declaration>,
) {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    for child in children {
        collect_into(child, source, classes, out);
    }
}

fn build_declaration(
    node: Node,
    kind: DeclKind,
    source: &str,
    classes: &[String],
) -> Option<Declaration> {
    let bytes = source.as_bytes();

    let name_node = node.child_by_field_name("name")?;
    let name = get_node_text(name_node, bytes).to_string();
    if name.is_empty() {
        return None;
    }

    let body = node.child_by_field_name("body")?;
    let statements = body_statements(body);
    let first_statement = *statements.first()?;

    // Decorators live on a wrapping node; the printed source should
    // include them.
    let span = match node.parent() {
        Some(parent) if parent.kind() == "decorated_definition" => {
            parent.start_byte()..parent.end_byte()
        }
        _ => node.start_byte()..node.end_byte(),
    };

    let body_start = body.start_byte();
    let prefix = &source[line_start(source, body_start)..body_start];
    let inline_suite = !prefix.chars().all(|c| c == ' ' || c == '\t');
    let body_indent = if inline_suite {
        String::new()
    } else {
        prefix.to_string()
    };

    let mut leading_doc_spans = Vec::new();
    let mut doc_raw = None;
    for statement in &statements {
        let Some(string_node) = doc_string_node(*statement) else {
            break;
        };
        leading_doc_spans.push(statement.start_byte()..statement.end_byte());
        if doc_raw.is_none() {
            doc_raw = Some(get_node_text(string_node, bytes).to_string());
        }
    }

    let qualified_name = if classes.is_empty() {
        name.clone()
    } else {
        format!("{}.{}", classes.join("."), name)
    };

    Some(Declaration {
        kind,
        name,
        qualified_name,
        line: node.start_position().row + 1,
        span,
        body_span: body.start_byte()..body.end_byte(),
        first_statement_start: first_statement.start_byte(),
        body_indent,
        inline_suite,
        enclosing_class: classes.last().cloned(),
        leading_doc_spans,
        doc_raw,
    })
}

/// Named statements of a block, with interleaved comments dropped.
fn body_statements(block: Node) -> Vec<Node> {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// The string node of an expression statement that wraps exactly one
/// string literal, if this statement is one.
fn doc_string_node(statement: Node) -> Option<Node> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    let mut cursor = statement.walk();
    let mut named = statement
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment");
    let first = named.next()?;
    if named.next().is_some() {
        return None;
    }
    (first.kind() == "string").then_some(first)
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
fn get_node_text<'a>(node: Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

fn line_start(source: &str, byte: usize) -> usize {
    source[..byte].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================
