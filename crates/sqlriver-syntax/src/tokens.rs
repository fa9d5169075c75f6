//! Token model shared by the lexer and parser.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Keyword,
    Identifier,
    String,
    Number,
    Operator,
    Punctuation,
    LineComment,
    BlockComment,
    Whitespace,
    Eof,
}

impl TokenKind {
    /// Trivia tokens are skipped by the parser after bookkeeping.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// One lexed token. `value` is the exact source lexeme; `upper` is the
/// ASCII-uppercased form used for keyword comparison (equal to `value` for
/// anything that is not a word).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub upper: String,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn end_offset(&self) -> usize {
        self.offset + self.value.len()
    }

    /// Keyword-or-identifier with the given uppercase text.
    pub fn is_word(&self, upper: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Identifier) && self.upper == upper
    }

    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.value == p
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.value == op
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// A short rendering for "found ..." diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.value),
        }
    }
}
