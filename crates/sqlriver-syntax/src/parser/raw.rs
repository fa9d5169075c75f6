//! Verbatim statement consumers: recovery capture, transaction control,
//! routine bodies, COPY payloads and delimiter scripts.

use crate::ast::{RawReason, RawStmt, StatementKind};
use crate::dialect::{DialectProfile, StatementHandler};
use crate::tokens::TokenKind;

use super::Parser;

/// Starters whose verbatim capture is transaction or session control
/// rather than a plain unsupported statement.
const TRANSACTION_STARTERS: &[&str] = &[
    "BEGIN",
    "COMMIT",
    "ROLLBACK",
    "SAVEPOINT",
    "RELEASE",
    "START",
    "END",
];

impl Parser<'_> {
    /// Consume tokens through the next top-level `;` (inclusive) and return
    /// the trimmed source slice. Returns `None` when the region is empty.
    pub(crate) fn consume_raw_statement(
        &mut self,
        start_offset: usize,
        reason: RawReason,
    ) -> Option<RawStmt> {
        let mut end = start_offset;
        let mut depth = 0_usize;
        loop {
            let token = self.peek().clone();
            if token.is_eof() {
                break;
            }
            if depth == 0
                && token.kind == TokenKind::Keyword
                && matches!(
                    self.profile.handler(&token.upper),
                    Some(StatementHandler::SingleLineUnsupported)
                )
                && end > start_offset
            {
                // A bare GO separator ends the statement without `;`.
                break;
            }
            if token.kind == TokenKind::Punctuation {
                match token.value.as_str() {
                    "(" | "[" => depth += 1,
                    ")" | "]" => depth = depth.saturating_sub(1),
                    ";" if depth == 0 => {
                        end = self.advance().end_offset();
                        break;
                    }
                    _ => {}
                }
            }
            end = self.advance().end_offset();
        }
        // Interior comments are part of the captured text.
        self.drain_pending_comments();
        let text = self.src[start_offset..end].trim();
        if text.is_empty() {
            None
        } else {
            Some(RawStmt {
                text: text.to_string(),
                reason,
            })
        }
    }

    /// Handler for verbatim starters: transaction control, session state,
    /// `BEGIN`/`IF` blocks and COPY payloads.
    pub(crate) fn parse_verbatim_statement(
        &mut self,
        start_offset: usize,
        upper: &str,
    ) -> StatementKind {
        self.set_statement_closed();
        let raw = match upper {
            "BEGIN" => {
                let next = self.peek_nth(1).clone();
                if next.is_punct(";")
                    || next.is_eof()
                    || next.is_word("TRANSACTION")
                    || next.is_word("TRAN")
                    || next.is_word("WORK")
                    || next.is_word("ISOLATION")
                    || next.is_word("READ")
                {
                    self.consume_raw_statement(start_offset, RawReason::TransactionControl)
                } else {
                    Some(self.consume_raw_block(start_offset))
                }
            }
            "IF" => {
                if self.statement_region_has_begin() {
                    Some(self.consume_raw_block(start_offset))
                } else {
                    self.consume_raw_statement(start_offset, RawReason::Unsupported)
                }
            }
            "COPY" => Some(self.consume_copy(start_offset)),
            _ => {
                let reason = if TRANSACTION_STARTERS.contains(&upper) {
                    RawReason::TransactionControl
                } else {
                    RawReason::Unsupported
                };
                self.consume_raw_statement(start_offset, reason)
            }
        };
        let raw = raw.unwrap_or_else(|| RawStmt {
            text: String::new(),
            reason: RawReason::Unsupported,
        });
        StatementKind::Raw(Box::new(raw))
    }

    /// Whether a BEGIN token appears before the next `;`.
    fn statement_region_has_begin(&self) -> bool {
        let mut idx = self.pos;
        loop {
            let token = self.token_at(idx);
            if token.is_eof() || token.is_punct(";") {
                return false;
            }
            if token.is_word("BEGIN") {
                return true;
            }
            idx += 1;
        }
    }

    /// Consume a block statement through its matching `END;`, counting
    /// BEGIN/CASE vs END nesting.
    pub(crate) fn consume_raw_block(&mut self, start_offset: usize) -> RawStmt {
        let mut end = start_offset;
        let mut depth = 0_usize;
        loop {
            let token = self.peek().clone();
            if token.is_eof() {
                break;
            }
            if depth == 0
                && token.kind == TokenKind::Keyword
                && matches!(
                    self.profile.handler(&token.upper),
                    Some(StatementHandler::SingleLineUnsupported)
                )
                && end > start_offset
            {
                break;
            }
            if token.is_word("BEGIN") || token.is_word("CASE") {
                depth += 1;
            } else if token.is_word("END") {
                // `END IF` / `END LOOP` close openers we never counted.
                let next = self.peek_nth(1);
                if !(next.is_word("IF")
                    || next.is_word("LOOP")
                    || next.is_word("WHILE")
                    || next.is_word("REPEAT"))
                {
                    depth = depth.saturating_sub(1);
                }
            } else if token.is_punct(";") && depth == 0 {
                end = self.advance().end_offset();
                break;
            }
            end = self.advance().end_offset();
        }
        self.drain_pending_comments();
        RawStmt {
            text: self.src[start_offset..end].trim().to_string(),
            reason: RawReason::Unsupported,
        }
    }

    /// CREATE PROCEDURE/FUNCTION/TRIGGER/EVENT bodies: consume through the
    /// terminator outside any BEGIN/END nesting.
    pub(crate) fn consume_raw_routine(&mut self, start_offset: usize) -> StatementKind {
        self.set_statement_closed();
        let raw = self.consume_raw_block(start_offset);
        StatementKind::Raw(Box::new(raw))
    }

    /// COPY statements: when the statement reads FROM STDIN, the payload up
    /// to and including the `\.` line belongs to the statement. The payload
    /// is sliced by byte offsets, not tokens.
    fn consume_copy(&mut self, start_offset: usize) -> RawStmt {
        let head = self
            .consume_raw_statement(start_offset, RawReason::Unsupported)
            .unwrap_or_else(|| RawStmt {
                text: String::new(),
                reason: RawReason::Unsupported,
            });
        let upper = head.text.to_ascii_uppercase();
        if !(upper.contains("FROM STDIN") || upper.contains("FROM  STDIN")) {
            return head;
        }
        let payload_start = start_offset + head.text.len();
        let rest = &self.src[payload_start.min(self.src.len())..];
        let mut line_start = 0_usize;
        let mut terminator_end = None;
        for line in rest.split_inclusive('\n') {
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if trimmed == "\\." && line_start > 0 {
                terminator_end = Some(payload_start + line_start + trimmed.len());
                break;
            }
            line_start += line.len();
        }
        let end = terminator_end.unwrap_or(self.src.len());
        // Resynchronize the token cursor past the payload.
        loop {
            let token = self.token_at(self.pos);
            if token.is_eof() || token.offset >= end {
                break;
            }
            self.pos += 1;
        }
        self.drain_pending_comments();
        RawStmt {
            text: self.src[start_offset..end].trim_end().to_string(),
            reason: RawReason::Unsupported,
        }
    }

    /// MySQL DELIMITER scripts: the rest of the input is one raw statement.
    pub(crate) fn consume_rest_verbatim(&mut self, start_offset: usize) -> StatementKind {
        self.set_statement_closed();
        while !self.peek().is_eof() {
            self.advance();
        }
        self.drain_pending_comments();
        StatementKind::Raw(Box::new(RawStmt {
            text: self.src[start_offset..].trim_end().to_string(),
            reason: RawReason::Verbatim,
        }))
    }
}

/// Post-hoc classification of recovered text that is probably valid SQL for
/// a dialect other than the active one.
pub(crate) fn looks_dialect_foreign(text: &str, profile: &DialectProfile) -> bool {
    let upper = text.to_ascii_uppercase();
    let trimmed = upper.trim_end_matches(';').trim();
    if trimmed == "GO" {
        return true;
    }
    // ODBC escape sequences: `{ fn now() }`, `{ call proc }`.
    if upper.contains("{FN ") || upper.contains("{ FN ") || upper.contains("{CALL") || upper.contains("{ CALL") {
        return true;
    }
    // T-SQL bracket identifiers outside a bracket-identifier dialect.
    if !profile.bracket_identifiers() && (text.contains("].[") || text.starts_with('[')) {
        return true;
    }
    // `@variable` usage.
    let bytes = text.as_bytes();
    for (idx, b) in bytes.iter().enumerate() {
        if *b == b'@' {
            let prev_ok = idx == 0 || bytes[idx - 1].is_ascii_whitespace() || bytes[idx - 1] == b'(' || bytes[idx - 1] == b',' || bytes[idx - 1] == b'=';
            let next_ok = bytes
                .get(idx + 1)
                .is_some_and(|n| n.is_ascii_alphabetic() || *n == b'_');
            if prev_ok && next_ok {
                return true;
            }
        }
    }
    false
}
