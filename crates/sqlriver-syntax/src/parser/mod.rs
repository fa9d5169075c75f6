//! Recursive-descent parser with statement-level recovery.
//!
//! The statement loop is the only place errors are caught: a failed
//! structured parse rewinds to the statement boundary and captures the
//! region verbatim as a raw node. Depth-limit errors are a security
//! boundary and always propagate.

use std::borrow::Cow;
use std::collections::HashMap;

use thiserror::Error;

use crate::ast::*;
use crate::dialect::{DialectProfile, StatementHandler};
use crate::error::Error as CrateError;
use crate::lexer::tokenize;
use crate::options::{ParseOptions, RecoverContext};
use crate::tokens::{Token, TokenKind};

mod ddl;
mod dml;
mod expr;
mod query;
mod raw;

/// A parse (syntax) error, including the depth-limit case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },

    #[error("maximum nesting depth of {max_depth} exceeded")]
    DepthLimitExceeded { max_depth: usize },
}

impl ParseError {
    /// Depth-limit errors are never recovered into raw nodes.
    pub fn is_depth_limit(&self) -> bool {
        matches!(self.kind, ParseErrorKind::DepthLimitExceeded { .. })
    }

    /// What the parser was looking for, for expectation errors.
    pub fn expected(&self) -> Option<&str> {
        match &self.kind {
            ParseErrorKind::Expected { expected, .. } => Some(expected),
            ParseErrorKind::DepthLimitExceeded { .. } => None,
        }
    }
}

/// Parse `text` into a statement sequence.
///
/// Returns an empty vector for all-whitespace input. Under
/// `options.recover` (the default) unparseable statements come back as
/// [`StatementKind::Raw`] nodes instead of failing the call.
#[tracing::instrument(level = "trace", skip_all, fields(bytes = text.len(), dialect = %options.dialect))]
pub fn parse(text: &str, options: ParseOptions) -> Result<Vec<Statement>, CrateError> {
    let tokens = tokenize(text, &options.tokenize_options())?;
    parse_statements(text, tokens, options)
}

/// Parse an already-tokenized source. `tokens` must come from [`tokenize`]
/// over the same `src` text.
pub fn parse_statements(
    src: &str,
    tokens: Vec<Token>,
    options: ParseOptions,
) -> Result<Vec<Statement>, CrateError> {
    let parser = Parser::new(src, tokens, options);
    parser.run().map_err(CrateError::from)
}

pub(crate) struct Parser<'s> {
    src: &'s str,
    profile: Cow<'static, DialectProfile>,
    /// Whitespace-free token stream, `eof`-terminated; comments retained.
    tokens: Vec<Token>,
    pos: usize,
    /// Token offset -> blank lines between it and the previous token.
    blank_lines: HashMap<usize, u32>,
    /// Comments stepped over by the cursor, waiting to be claimed.
    pending_comments: Vec<PendingComment>,
    /// Line on which the previously consumed significant token ended.
    last_line: u32,
    depth: usize,
    /// Set by statement parsers that consume their own terminator.
    statement_closed: bool,
    options: ParseOptions,
}

type PResult<T> = Result<T, ParseError>;

/// A stashed comment plus the line it started on, for trailing-comment
/// attachment decisions.
struct PendingComment {
    comment: Comment,
    line: u32,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str, raw_tokens: Vec<Token>, options: ParseOptions) -> Self {
        let mut tokens = Vec::with_capacity(raw_tokens.len());
        let mut blank_lines = HashMap::new();
        let mut pending_blanks = 0_u32;
        for token in raw_tokens {
            if token.kind == TokenKind::Whitespace {
                let newlines = token.value.matches('\n').count() as u32;
                pending_blanks = newlines.saturating_sub(1);
                continue;
            }
            if pending_blanks > 0 {
                blank_lines.insert(token.offset, pending_blanks);
                pending_blanks = 0;
            }
            tokens.push(token);
        }
        debug_assert!(tokens.last().is_some_and(Token::is_eof));
        let profile = options.resolve_profile();
        Self {
            src,
            profile,
            tokens,
            pos: 0,
            blank_lines,
            pending_comments: Vec::new(),
            last_line: 1,
            depth: 0,
            statement_closed: false,
            options,
        }
    }

    fn run(mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.collect_comments();
            let token = self.token_at(self.pos).clone();
            if token.is_punct(";") {
                if self.pending_comments.is_empty() {
                    self.pos += 1;
                    self.last_line = token.line;
                    continue;
                }
                // A comment-only statement: just comments up to `;`.
                self.pos += 1;
                self.last_line = token.line;
                statements.push(self.comment_only_statement());
                continue;
            }
            if token.is_eof() {
                if !self.pending_comments.is_empty() {
                    statements.push(self.comment_only_statement());
                }
                break;
            }
            self.parse_one(&mut statements)?;
        }
        Ok(statements)
    }

    fn parse_one(&mut self, statements: &mut Vec<Statement>) -> PResult<()> {
        let snapshot = self.pos;
        let first = self.token_at(self.pos).clone();
        let leading = self.take_pending_comments();
        let blank_lines_before = leading
            .first()
            .map_or_else(|| self.blank_before(&first), |c| c.blank_lines_before);

        self.statement_closed = false;
        self.depth = 0;
        match self.parse_statement_terminated(first.offset) {
            Ok(kind) => {
                let mut stmt = Statement {
                    leading_comments: leading,
                    trailing_comments: Vec::new(),
                    blank_lines_before,
                    kind,
                };
                if let Some(comment) = self.trailing_line_comment() {
                    stmt.trailing_comments.push(comment);
                }
                let mut leftovers = self.drain_pending_comments();
                stmt.trailing_comments.append(&mut leftovers);
                statements.push(stmt);
                Ok(())
            }
            Err(err) if err.is_depth_limit() => Err(err),
            Err(err) if !self.options.recover => Err(err),
            Err(err) => {
                tracing::trace!(error = %err, "recovering statement as raw");
                self.pos = snapshot;
                self.pending_comments.clear();
                let raw = self.consume_raw_statement(first.offset, RawReason::ParseError);
                let context = RecoverContext {
                    statement_index: statements.len(),
                    total_statements: statements.len() + usize::from(raw.is_some()),
                };
                match raw {
                    Some(mut raw) => {
                        if raw::looks_dialect_foreign(&raw.text, &self.profile) {
                            raw.reason = RawReason::Unsupported;
                        }
                        let mut stmt = Statement {
                            leading_comments: leading,
                            trailing_comments: Vec::new(),
                            blank_lines_before,
                            kind: StatementKind::Raw(Box::new(raw)),
                        };
                        if let Some(comment) = self.trailing_line_comment() {
                            stmt.trailing_comments.push(comment);
                        }
                        if let Some(hook) = self.options.on_recover.as_mut() {
                            hook(&err, Some(&stmt), context);
                        }
                        statements.push(stmt);
                    }
                    None => {
                        if let Some(hook) = self.options.on_drop_statement.as_mut() {
                            hook(&err, context);
                        } else if let Some(hook) = self.options.on_recover.as_mut() {
                            hook(&err, None, context);
                        } else {
                            tracing::warn!(error = %err, "dropped empty unparseable region");
                        }
                    }
                }
                Ok(())
            }
        }
    }

    fn comment_only_statement(&mut self) -> Statement {
        let comments = self.drain_pending_comments();
        let blank_lines_before = comments.first().map_or(0, |c| c.blank_lines_before);
        let text = comments
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Statement {
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
            blank_lines_before,
            kind: StatementKind::Raw(Box::new(RawStmt {
                text,
                reason: RawReason::CommentOnly,
            })),
        }
    }

    /// Parse one statement and its terminator.
    fn parse_statement_terminated(&mut self, start_offset: usize) -> PResult<StatementKind> {
        let kind = self.parse_statement(start_offset)?;
        if !self.statement_closed {
            let next = self.peek();
            if next.is_punct(";") {
                self.advance();
            } else if !next.is_eof() {
                return Err(self.expected("`;` or end of input"));
            }
        }
        Ok(kind)
    }

    /// Statement dispatch on the first keyword.
    fn parse_statement(&mut self, start_offset: usize) -> PResult<StatementKind> {
        let token = self.peek().clone();
        if token.is_punct("(") {
            let q = self.parse_query()?;
            return Ok(self.query_to_statement(q));
        }
        if !matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier) {
            return Err(self.expected("a statement"));
        }
        match self.profile.handler(&token.upper) {
            Some(StatementHandler::Structured) => self.parse_structured(&token.upper),
            Some(StatementHandler::VerbatimUnsupported) => {
                Ok(self.parse_verbatim_statement(start_offset, &token.upper))
            }
            Some(StatementHandler::SingleLineUnsupported) => {
                let word = self.advance();
                self.statement_closed = true;
                Ok(StatementKind::Raw(Box::new(RawStmt {
                    text: word.value,
                    reason: RawReason::Unsupported,
                })))
            }
            Some(StatementHandler::DelimiterScript) => {
                Ok(self.consume_rest_verbatim(start_offset))
            }
            None => {
                if self.options.recover {
                    let raw = self
                        .consume_raw_statement(start_offset, RawReason::Unsupported)
                        .expect("statement start token exists");
                    self.statement_closed = true;
                    Ok(StatementKind::Raw(Box::new(raw)))
                } else {
                    Err(self.expected("a statement"))
                }
            }
        }
    }

    fn parse_structured(&mut self, upper: &str) -> PResult<StatementKind> {
        match upper {
            "SELECT" | "VALUES" => {
                let q = self.parse_query()?;
                Ok(self.query_to_statement(q))
            }
            "WITH" => self.parse_with_statement(),
            "INSERT" => Ok(StatementKind::Insert(Box::new(self.parse_insert()?))),
            "UPDATE" => Ok(StatementKind::Update(Box::new(self.parse_update()?))),
            "DELETE" => Ok(StatementKind::Delete(Box::new(self.parse_delete()?))),
            "MERGE" => Ok(StatementKind::Merge(Box::new(self.parse_merge()?))),
            "CREATE" => self.parse_create(),
            "ALTER" => self.parse_alter(),
            "DROP" => self.parse_drop(),
            "EXPLAIN" => self.parse_explain(),
            "GRANT" | "REVOKE" => Ok(StatementKind::Grant(Box::new(self.parse_grant()?))),
            "TRUNCATE" => Ok(StatementKind::Truncate(Box::new(self.parse_truncate()?))),
            _ => Err(self.expected("a statement")),
        }
    }

    pub(crate) fn query_to_statement(&mut self, query: Query) -> StatementKind {
        match query {
            Query::Select(s) => StatementKind::Select(s),
            Query::Union(u) => StatementKind::Union(u),
            Query::Values(v) => StatementKind::StandaloneValues(v),
            Query::With(w) => StatementKind::Cte(w),
            Query::Paren(inner) => StatementKind::Union(Box::new(Union {
                first: Query::Paren(inner),
                arms: Vec::new(),
                order_by: Vec::new(),
                limit: None,
                offset: None,
                fetch: None,
                locking: None,
            })),
        }
    }

    // region: cursor

    fn token_at(&self, pos: usize) -> &Token {
        self.tokens.get(pos).unwrap_or_else(|| {
            self.tokens.last().expect("token stream is never empty")
        })
    }

    /// First significant token at or after the cursor, comments skipped but
    /// not consumed.
    pub(crate) fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        let mut remaining = n;
        let mut idx = self.pos;
        loop {
            let token = self.token_at(idx);
            if token.kind.is_comment() {
                idx += 1;
                continue;
            }
            if remaining == 0 || token.is_eof() {
                return token;
            }
            remaining -= 1;
            idx += 1;
        }
    }

    /// Consume (stashing any skipped comments) and return the next
    /// significant token.
    pub(crate) fn advance(&mut self) -> Token {
        self.collect_comments();
        let token = self.token_at(self.pos).clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        self.last_line = token.line + token.value.matches('\n').count() as u32;
        token
    }

    /// Move comment tokens at the cursor into the pending list.
    pub(crate) fn collect_comments(&mut self) {
        while self.token_at(self.pos).kind.is_comment() {
            let token = self.token_at(self.pos).clone();
            let comment = self.comment_from(&token);
            self.pending_comments.push(PendingComment {
                comment,
                line: token.line,
            });
            self.pos += 1;
        }
    }

    pub(crate) fn comment_from(&self, token: &Token) -> Comment {
        Comment {
            style: if token.kind == TokenKind::LineComment {
                CommentStyle::Line
            } else {
                CommentStyle::Block
            },
            text: token.value.clone(),
            blank_lines_before: self.blank_before(token),
        }
    }

    pub(crate) fn blank_before(&self, token: &Token) -> u32 {
        self.blank_lines.get(&token.offset).copied().unwrap_or(0)
    }

    /// Comments accumulated while stepping over tokens, to be attached to
    /// the nearest construct. Also pulls comments at the cursor.
    pub(crate) fn take_pending_comments(&mut self) -> Vec<Comment> {
        self.collect_comments();
        self.drain_pending_comments()
    }

    /// Drain only the already-stashed comments, without looking at the
    /// token stream.
    pub(crate) fn drain_pending_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.pending_comments)
            .into_iter()
            .map(|p| p.comment)
            .collect()
    }

    /// A comment sitting on the same line as the last consumed token.
    /// Line comments are the common case; same-line block comments also
    /// attach here so that reformatting keeps them in place.
    pub(crate) fn trailing_line_comment(&mut self) -> Option<Comment> {
        if let Some(first) = self.pending_comments.first() {
            // A comment that was already stepped over on this line.
            if first.line == self.last_line {
                return Some(self.pending_comments.remove(0).comment);
            }
        }
        let token = self.token_at(self.pos);
        if token.kind.is_comment() && token.line == self.last_line {
            let token = token.clone();
            let comment = self.comment_from(&token);
            self.pos += 1;
            return Some(comment);
        }
        None
    }

    // endregion

    // region: expectation helpers

    pub(crate) fn at_word(&self, upper: &str) -> bool {
        self.peek().is_word(upper)
    }

    pub(crate) fn at_any_word(&self, words: &[&str]) -> bool {
        let token = self.peek();
        words.iter().any(|w| token.is_word(w))
    }

    pub(crate) fn at_punct(&self, p: &str) -> bool {
        self.peek().is_punct(p)
    }

    pub(crate) fn at_operator(&self, op: &str) -> bool {
        self.peek().is_operator(op)
    }

    pub(crate) fn eat_word(&mut self, upper: &str) -> bool {
        if self.at_word(upper) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_punct(&mut self, p: &str) -> bool {
        if self.at_punct(p) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_operator(&mut self, op: &str) -> bool {
        if self.at_operator(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_word(&mut self, upper: &str) -> PResult<Token> {
        if self.at_word(upper) {
            Ok(self.advance())
        } else {
            Err(self.expected(&format!("`{upper}`")))
        }
    }

    pub(crate) fn expect_punct(&mut self, p: &str) -> PResult<Token> {
        if self.at_punct(p) {
            Ok(self.advance())
        } else {
            Err(self.expected(&format!("`{p}`")))
        }
    }

    /// A keyword-or-identifier token in a name position.
    pub(crate) fn expect_name_token(&mut self, what: &str) -> PResult<Token> {
        let token = self.peek();
        if matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier) {
            Ok(self.advance())
        } else {
            Err(self.expected(what))
        }
    }

    pub(crate) fn expected(&self, what: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            kind: ParseErrorKind::Expected {
                expected: what.to_string(),
                found: token.describe(),
            },
            line: token.line,
            column: token.column,
            offset: token.offset,
        }
    }

    // endregion

    /// Mark the current statement as having consumed its own terminator.
    pub(crate) fn set_statement_closed(&mut self) {
        self.statement_closed = true;
    }

    // region: depth guard

    pub(crate) fn with_depth<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            self.depth -= 1;
            let token = self.peek();
            return Err(ParseError {
                kind: ParseErrorKind::DepthLimitExceeded {
                    max_depth: self.options.max_depth,
                },
                line: token.line,
                column: token.column,
                offset: token.offset,
            });
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    // endregion

    // region: verbatim capture

    /// Capture source text token-by-token until a top-level stop token,
    /// tracking paren/bracket nesting. The stop token is not consumed.
    pub(crate) fn verbatim_until(
        &mut self,
        stop_puncts: &[&str],
        stop_words: &[&str],
    ) -> Option<String> {
        let start = self.peek().offset;
        let mut end = start;
        let mut depth = 0_usize;
        loop {
            let token = self.peek();
            if token.is_eof() {
                break;
            }
            if depth == 0 {
                if stop_puncts.iter().any(|p| token.is_punct(p)) {
                    break;
                }
                if stop_words.iter().any(|w| token.is_word(w)) {
                    break;
                }
            }
            if token.kind == TokenKind::Punctuation {
                match token.value.as_str() {
                    "(" | "[" => depth += 1,
                    ")" | "]" => {
                        if depth == 0 {
                            break;
                        }
                        depth -= 1;
                    }
                    _ => {}
                }
            }
            let token = self.advance();
            end = token.end_offset();
        }
        (end > start).then(|| self.src[start..end].trim().to_string())
    }

    /// Whether the `(` at the cursor opens a query expression.
    pub(crate) fn paren_starts_query(&self) -> bool {
        let mut idx = self.pos;
        let mut seen_open = false;
        loop {
            let token = self.token_at(idx);
            if token.is_eof() {
                return false;
            }
            if token.kind.is_comment() {
                idx += 1;
                continue;
            }
            if token.is_punct("(") {
                seen_open = true;
                idx += 1;
                continue;
            }
            if !seen_open {
                return false;
            }
            return token.is_word("SELECT") || token.is_word("WITH") || token.is_word("VALUES");
        }
    }

    // endregion
}
