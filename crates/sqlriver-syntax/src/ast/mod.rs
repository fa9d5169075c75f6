//! The tagged AST produced by the parser.
//!
//! Every node is built during parsing and never mutated afterwards. Trees
//! are owned top-down; recursive CTEs are represented by name, so no cycles
//! exist anywhere.

use serde::{Deserialize, Serialize};

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

/// A comment attached to a node, with the number of blank lines that
/// separated it from the preceding token in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub style: CommentStyle,
    pub text: String,
    pub blank_lines_before: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStyle {
    Line,
    Block,
}

impl Comment {
    pub fn is_line(&self) -> bool {
        self.style == CommentStyle::Line
    }
}

/// A possibly-dotted name; each part keeps its source lexeme (including
/// identifier quotes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn single(part: impl Into<String>) -> Self {
        Self {
            parts: vec![part.into()],
        }
    }

    pub fn joined(&self) -> String {
        self.parts.join(".")
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.joined())
    }
}

/// One top-level statement with its attached trivia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Comments that preceded the first token of the statement.
    pub leading_comments: Vec<Comment>,
    /// Comments left over at the end of the statement (after the
    /// terminating semicolon, on the same line).
    pub trailing_comments: Vec<Comment>,
    /// Blank lines between the previous statement and this one.
    pub blank_lines_before: u32,
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
            blank_lines_before: 0,
            kind,
        }
    }

    pub fn as_raw(&self) -> Option<&RawStmt> {
        match &self.kind {
            StatementKind::Raw(raw) => Some(raw),
            _ => None,
        }
    }
}

/// Why a statement was kept as verbatim source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawReason {
    ParseError,
    Unsupported,
    CommentOnly,
    TransactionControl,
    Verbatim,
}

/// A passthrough statement: the trimmed source slice, terminator included
/// when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStmt {
    pub text: String,
    pub reason: RawReason,
}
