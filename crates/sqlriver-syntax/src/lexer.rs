//! Dialect-parameterized scanner.
//!
//! Every byte of the source survives in some token's `value`; offsets are
//! monotonic and the concatenation of all lexemes reproduces the input.

use crate::dialect::DialectProfile;
use crate::error::Error;
use crate::options::TokenizeOptions;
use crate::tokens::{Token, TokenKind};

use thiserror::Error as ThisError;

/// Unquoted identifiers longer than this raise [`TokenizeErrorKind::IdentifierTooLong`].
pub const MAX_IDENTIFIER_BYTES: usize = 10_000;

/// Duration suffixes that glue onto a numeric literal (`10ms`, `5y`).
const DURATION_SUFFIXES: &[&str] = &["ns", "us", "ms", "s", "m", "h", "d", "w", "mon", "y"];

const OPERATORS_3: &[&str] = &["->>", "#>>", "!~*"];
const OPERATORS_2: &[&str] = &[
    "<=", ">=", "<>", "!=", "||", "::", "->", "#>", "@>", "<@", "&&", "?|", "?&", "@?", "@@",
    "~*", "!~", "<<", ">>", "+=", "-=", "*=", "/=", "%=", "&=", "^=", "|=", "=>",
];
const OPERATORS_1: &[u8] = b"+-*/%<>=!~^&|?@#$";

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{kind} at line {line}, column {column}")]
pub struct TokenizeError {
    pub kind: TokenizeErrorKind,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TokenizeErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("identifier longer than {MAX_IDENTIFIER_BYTES} bytes")]
    IdentifierTooLong,
    #[error("token limit of {0} exceeded, raise `max_token_count` to lex larger inputs")]
    TokenLimitExceeded(usize),
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Lex `text` into a token vector terminated by an `eof` token.
///
/// Whitespace and comments are emitted as ordinary tokens so that callers
/// can reconstruct the source byte for byte.
#[tracing::instrument(level = "trace", skip_all, fields(bytes = text.len()))]
pub fn tokenize(text: &str, options: &TokenizeOptions) -> Result<Vec<Token>, Error> {
    if text.len() > options.max_input_size {
        return Err(Error::InputTooLarge {
            size: text.len(),
            max_input_size: options.max_input_size,
        });
    }
    let lexer = Lexer::new(text, options.dialect.profile(), options);
    lexer.run().map_err(Error::from)
}

pub(crate) struct Lexer<'s> {
    src: &'s str,
    bytes: &'s [u8],
    profile: &'s DialectProfile,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
    max_tokens: usize,
    allow_meta_commands: bool,
}

impl<'s> Lexer<'s> {
    pub(crate) fn new(
        src: &'s str,
        profile: &'s DialectProfile,
        options: &TokenizeOptions,
    ) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            profile,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            max_tokens: options.max_token_count,
            allow_meta_commands: options.allow_meta_commands,
        }
    }

    pub(crate) fn run(mut self) -> Result<Vec<Token>, TokenizeError> {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let kind = self.next_kind(start)?;
            debug_assert!(self.pos > start, "lexer must always make progress");
            self.push(kind, start)?;
        }
        let eof = Token {
            kind: TokenKind::Eof,
            value: String::new(),
            upper: String::new(),
            offset: self.src.len(),
            line: self.line,
            column: self.column,
        };
        self.check_budget(self.src.len())?;
        self.tokens.push(eof);
        Ok(self.tokens)
    }

    fn next_kind(&mut self, start: usize) -> Result<TokenKind, TokenizeError> {
        let b = self.bytes[start];
        if b.is_ascii_whitespace() {
            self.lex_whitespace();
            return Ok(TokenKind::Whitespace);
        }
        if self.at_line_comment(start) {
            self.lex_line_comment();
            return Ok(TokenKind::LineComment);
        }
        if b == b'\\' && self.allow_meta_commands {
            // psql meta-commands (`\gset`, `\.`) survive as line comments.
            self.lex_line_comment();
            return Ok(TokenKind::LineComment);
        }
        if b == b'/' && self.byte_at(start + 1) == Some(b'*') {
            self.lex_block_comment(start)?;
            return Ok(TokenKind::BlockComment);
        }
        match b {
            b'\'' => {
                self.pos = start + 1;
                self.scan_single_quoted(start, self.profile.backslash_string_escapes())?;
                Ok(TokenKind::String)
            }
            b'"' => self.lex_quoted_identifier(start, b'"', b'"'),
            b'`' if self.profile.backtick_identifiers() => {
                self.lex_quoted_identifier(start, b'`', b'`')
            }
            b'[' if self.profile.bracket_identifiers() => {
                self.lex_quoted_identifier(start, b'[', b']')
            }
            b'$' => self.lex_dollar(start),
            b'0'..=b'9' => {
                self.lex_number(start);
                Ok(TokenKind::Number)
            }
            b'.' if self.at_decimal_point(start) => {
                self.lex_number(start);
                Ok(TokenKind::Number)
            }
            b'@' => self.lex_at_sign(start),
            b':' => Ok(self.lex_colon(start)),
            b'<' if self.profile.template_placeholders() => {
                if let Some(end) = self.template_placeholder_end(start) {
                    self.pos = end;
                    Ok(TokenKind::Identifier)
                } else {
                    self.lex_operator(start)
                }
            }
            b'(' | b')' | b'[' | b']' | b'{' | b'}' | b',' | b';' | b'.' => {
                self.pos = start + 1;
                Ok(TokenKind::Punctuation)
            }
            _ if is_identifier_start(self.char_at(start)) => self.lex_word(start),
            _ => self.lex_operator(start),
        }
    }

    // region: helpers

    fn byte_at(&self, idx: usize) -> Option<u8> {
        self.bytes.get(idx).copied()
    }

    fn char_at(&self, idx: usize) -> char {
        self.src[idx..].chars().next().unwrap_or('\0')
    }

    fn error_at(&self, kind: TokenizeErrorKind, offset: usize) -> TokenizeError {
        // Errors are raised before `line`/`column` advance past the
        // offending token, so the counters still point at its start.
        TokenizeError {
            kind,
            offset,
            line: self.line,
            column: self.column,
        }
    }

    fn check_budget(&self, offset: usize) -> Result<(), TokenizeError> {
        if self.tokens.len() >= self.max_tokens {
            return Err(self.error_at(
                TokenizeErrorKind::TokenLimitExceeded(self.max_tokens),
                offset,
            ));
        }
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, start: usize) -> Result<(), TokenizeError> {
        self.check_budget(start)?;
        let value = self.src[start..self.pos].to_string();
        let mut kind = kind;
        let upper = match kind {
            TokenKind::Keyword | TokenKind::Identifier => {
                let upper = value.to_ascii_uppercase();
                if kind == TokenKind::Identifier
                    && !starts_with_quote(&value)
                    && self.profile.is_keyword(&upper)
                {
                    kind = TokenKind::Keyword;
                }
                upper
            }
            _ => value.clone(),
        };
        let token = Token {
            kind,
            value,
            upper,
            offset: start,
            line: self.line,
            column: self.column,
        };
        for c in token.value.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.tokens.push(token);
        Ok(())
    }

    /// Kind of the last non-trivia token, for `.5` disambiguation.
    fn previous_significant(&self) -> Option<&Token> {
        self.tokens.iter().rev().find(|t| !t.kind.is_trivia())
    }

    // endregion

    // region: trivia

    fn lex_whitespace(&mut self) {
        while self
            .byte_at(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }

    fn at_line_comment(&self, start: usize) -> bool {
        self.profile
            .line_comment_prefixes()
            .iter()
            .any(|prefix| self.src[start..].starts_with(prefix))
    }

    fn lex_line_comment(&mut self) {
        while let Some(b) = self.byte_at(self.pos) {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn lex_block_comment(&mut self, start: usize) -> Result<(), TokenizeError> {
        self.pos = start + 2;
        let mut depth = 1_usize;
        while self.pos < self.bytes.len() {
            if self.src[self.pos..].starts_with("/*") {
                depth += 1;
                self.pos += 2;
            } else if self.src[self.pos..].starts_with("*/") {
                depth -= 1;
                self.pos += 2;
                if depth == 0 {
                    return Ok(());
                }
            } else {
                self.pos += 1;
            }
        }
        Err(self.error_at(TokenizeErrorKind::UnterminatedBlockComment, start))
    }

    // endregion

    // region: strings and quoted identifiers

    /// Scan the body of a `'...'` literal; `self.pos` must sit just past the
    /// opening quote. Doubled quotes stay inside the literal.
    fn scan_single_quoted(&mut self, start: usize, backslash: bool) -> Result<(), TokenizeError> {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' if backslash => {
                    self.pos = (self.pos + 2).min(self.bytes.len());
                }
                b'\'' => {
                    if self.byte_at(self.pos + 1) == Some(b'\'') {
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                _ => self.pos += 1,
            }
        }
        Err(self.error_at(TokenizeErrorKind::UnterminatedString, start))
    }

    fn lex_quoted_identifier(
        &mut self,
        start: usize,
        open: u8,
        close: u8,
    ) -> Result<TokenKind, TokenizeError> {
        debug_assert_eq!(self.bytes[start], open);
        self.pos = start + 1;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == close {
                if self.byte_at(self.pos + 1) == Some(close) {
                    self.pos += 2;
                } else {
                    self.pos += 1;
                    return Ok(TokenKind::Identifier);
                }
            } else {
                self.pos += 1;
            }
        }
        Err(self.error_at(TokenizeErrorKind::UnterminatedString, start))
    }

    fn lex_dollar(&mut self, start: usize) -> Result<TokenKind, TokenizeError> {
        // `$1` positional placeholder.
        if self.byte_at(start + 1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos = start + 1;
            while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
            return Ok(TokenKind::Identifier);
        }
        // `$tag$ ... $tag$` dollar quoting; the tag may be empty.
        let mut tag_end = start + 1;
        while self
            .byte_at(tag_end)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            tag_end += 1;
        }
        if self.byte_at(tag_end) == Some(b'$') {
            let delim = &self.src[start..=tag_end];
            let body_start = tag_end + 1;
            match self.src[body_start..].find(delim) {
                Some(rel) => {
                    self.pos = body_start + rel + delim.len();
                    return Ok(TokenKind::String);
                }
                None => {
                    return Err(self.error_at(TokenizeErrorKind::UnterminatedString, start));
                }
            }
        }
        self.pos = start + 1;
        Ok(TokenKind::Operator)
    }

    // endregion

    // region: words, numbers, operators

    fn lex_word(&mut self, start: usize) -> Result<TokenKind, TokenizeError> {
        let mut end = start;
        for (idx, c) in self.src[start..].char_indices() {
            if idx == 0 {
                end = start + c.len_utf8();
                continue;
            }
            if is_identifier_continue(c) {
                end = start + idx + c.len_utf8();
            } else {
                break;
            }
        }
        if end - start > MAX_IDENTIFIER_BYTES {
            return Err(self.error_at(TokenizeErrorKind::IdentifierTooLong, start));
        }
        self.pos = end;
        let word = &self.src[start..end];

        // String-literal prefixes glue the whole literal into one token.
        if self.byte_at(end) == Some(b'\'') {
            if word.len() == 1 && matches!(word.as_bytes()[0], b'e' | b'E') {
                self.pos = end + 1;
                self.scan_single_quoted(start, true)?;
                return Ok(TokenKind::String);
            }
            if word.len() == 1 && matches!(word.as_bytes()[0], b'n' | b'N' | b'b' | b'B' | b'x' | b'X') {
                self.pos = end + 1;
                self.scan_single_quoted(start, false)?;
                return Ok(TokenKind::String);
            }
            if word.starts_with('_') && word.len() > 1 {
                // Charset introducers: `_binary'...'`, `_utf8mb4'...'`.
                self.pos = end + 1;
                self.scan_single_quoted(start, false)?;
                return Ok(TokenKind::String);
            }
            if (word == "q" || word == "Q")
                && matches!(self.byte_at(end + 1), Some(b'[' | b'{' | b'(' | b'<'))
            {
                return self.lex_q_string(start, self.bytes[end + 1]);
            }
        }
        if (word == "U" || word == "u")
            && self.byte_at(end) == Some(b'&')
            && self.byte_at(end + 1) == Some(b'\'')
        {
            self.pos = end + 2;
            self.scan_single_quoted(start, false)?;
            return Ok(TokenKind::String);
        }

        Ok(TokenKind::Identifier)
    }

    /// Oracle `q'[...]'` and friends. `self.pos` sits past the opener.
    fn lex_q_string(&mut self, start: usize, open: u8) -> Result<TokenKind, TokenizeError> {
        let close = match open {
            b'[' => b']',
            b'{' => b'}',
            b'(' => b')',
            b'<' => b'>',
            _ => unreachable!(),
        };
        // start + q + quote + opener
        let mut i = start + 3;
        while i + 1 < self.bytes.len() {
            if self.bytes[i] == close && self.bytes[i + 1] == b'\'' {
                self.pos = i + 2;
                return Ok(TokenKind::String);
            }
            i += 1;
        }
        Err(self.error_at(TokenizeErrorKind::UnterminatedString, start))
    }

    fn at_decimal_point(&self, start: usize) -> bool {
        if !self.byte_at(start + 1).is_some_and(|b| b.is_ascii_digit()) {
            return false;
        }
        // `t.5` is member access, `(.5` and `+ .5` are literals.
        match self.previous_significant() {
            Some(t) => {
                !(matches!(t.kind, TokenKind::Identifier | TokenKind::Number)
                    || t.is_punct(")")
                    || t.is_punct("]"))
            }
            None => true,
        }
    }

    fn lex_number(&mut self, start: usize) {
        let mut i = start;
        if self.bytes[i] == b'0' && matches!(self.byte_at(i + 1), Some(b'x' | b'X')) {
            i += 2;
            while self
                .byte_at(i)
                .is_some_and(|b| b.is_ascii_hexdigit() || b == b'_')
            {
                i += 1;
            }
            self.pos = i;
            return;
        }
        if self.bytes[i] == b'0' && matches!(self.byte_at(i + 1), Some(b'b' | b'B'))
            && self.byte_at(i + 2).is_some_and(|b| b == b'0' || b == b'1')
        {
            i += 2;
            while self.byte_at(i).is_some_and(|b| b == b'0' || b == b'1' || b == b'_') {
                i += 1;
            }
            self.pos = i;
            return;
        }
        while self.byte_at(i).is_some_and(|b| b.is_ascii_digit()) {
            i += 1;
        }
        if self.bytes.get(i) == Some(&b'.')
            && self.byte_at(i + 1).is_some_and(|b| b.is_ascii_digit())
        {
            i += 1;
            while self.byte_at(i).is_some_and(|b| b.is_ascii_digit()) {
                i += 1;
            }
        } else if self.bytes.get(i) == Some(&b'.') && start < i {
            // Trailing-dot decimals (`1.`) stay a single number.
            let after = self.byte_at(i + 1);
            if !after.is_some_and(|b| b == b'.' || is_identifier_start(char::from(b))) {
                i += 1;
            }
        }
        if matches!(self.byte_at(i), Some(b'e' | b'E')) {
            let mut j = i + 1;
            if matches!(self.byte_at(j), Some(b'+' | b'-')) {
                j += 1;
            }
            if self.byte_at(j).is_some_and(|b| b.is_ascii_digit()) {
                i = j;
                while self.byte_at(i).is_some_and(|b| b.is_ascii_digit()) {
                    i += 1;
                }
            }
        }
        // Duration suffix (`10ms`, `5y`) glued to the digits.
        let suffix_start = i;
        let mut j = i;
        while self.byte_at(j).is_some_and(|b| b.is_ascii_alphabetic()) {
            j += 1;
        }
        if j > suffix_start {
            let suffix = &self.src[suffix_start..j];
            if DURATION_SUFFIXES
                .iter()
                .any(|s| s.eq_ignore_ascii_case(suffix))
            {
                i = j;
            }
        }
        self.pos = i;
    }

    fn lex_at_sign(&mut self, start: usize) -> Result<TokenKind, TokenizeError> {
        // `@var` and `@@global` lex as single identifier tokens.
        let mut i = start + 1;
        if self.byte_at(i) == Some(b'@') {
            i += 1;
        }
        if i < self.src.len() && is_identifier_start(self.char_at(i)) {
            let mut end = i;
            for (idx, c) in self.src[i..].char_indices() {
                if idx == 0 || is_identifier_continue(c) {
                    end = i + idx + c.len_utf8();
                } else {
                    break;
                }
            }
            self.pos = end;
            Ok(TokenKind::Identifier)
        } else {
            self.lex_operator(start)
        }
    }

    fn lex_colon(&mut self, start: usize) -> TokenKind {
        match self.byte_at(start + 1) {
            Some(b':') => {
                self.pos = start + 2;
                TokenKind::Operator
            }
            // psql interpolation: `:name`, `:'name'`, `:"name"`.
            Some(b'\'') => {
                self.pos = start + 2;
                if self.scan_single_quoted(start, false).is_ok() {
                    TokenKind::Identifier
                } else {
                    self.pos = start + 1;
                    TokenKind::Punctuation
                }
            }
            Some(b'"') => {
                self.pos = start + 1;
                if self.lex_quoted_identifier(start + 1, b'"', b'"').is_ok() {
                    TokenKind::Identifier
                } else {
                    self.pos = start + 1;
                    TokenKind::Punctuation
                }
            }
            Some(b) if is_identifier_start(char::from(b)) => {
                self.pos = start + 1;
                let _ = self.lex_word(start + 1);
                TokenKind::Identifier
            }
            _ => {
                self.pos = start + 1;
                TokenKind::Punctuation
            }
        }
    }

    /// T-SQL `<name, type, default>` template placeholders: a short,
    /// single-line `<...>` region with at least two commas.
    fn template_placeholder_end(&self, start: usize) -> Option<usize> {
        let mut commas = 0;
        for (idx, b) in self.bytes[start + 1..].iter().enumerate() {
            if idx > 300 {
                return None;
            }
            match b {
                b'\n' | b'<' | b'(' | b')' | b'\'' => return None,
                b',' => commas += 1,
                b'>' => {
                    return (commas >= 2).then_some(start + 1 + idx + 1);
                }
                _ => {}
            }
        }
        None
    }

    fn lex_operator(&mut self, start: usize) -> Result<TokenKind, TokenizeError> {
        let rest = &self.src[start..];
        for op in OPERATORS_3 {
            if rest.starts_with(op) {
                self.pos = start + op.len();
                return Ok(TokenKind::Operator);
            }
        }
        for op in OPERATORS_2 {
            if rest.starts_with(op) {
                self.pos = start + op.len();
                return Ok(TokenKind::Operator);
            }
        }
        let b = self.bytes[start];
        if OPERATORS_1.contains(&b) {
            self.pos = start + 1;
            return Ok(TokenKind::Operator);
        }
        Err(self.error_at(
            TokenizeErrorKind::InvalidCharacter(self.char_at(start)),
            start,
        ))
    }

    // endregion
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c as u32 >= 0x80
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c as u32 >= 0x80
}

fn starts_with_quote(value: &str) -> bool {
    matches!(value.as_bytes().first(), Some(b'"' | b'`' | b'['))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TokenizeOptions;
    use crate::Dialect;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn lex(src: &str) -> Vec<Token> {
        tokenize(src, &TokenizeOptions::default()).unwrap()
    }

    fn lex_with(src: &str, dialect: Dialect) -> Vec<Token> {
        tokenize(
            src,
            &TokenizeOptions {
                dialect,
                ..TokenizeOptions::default()
            },
        )
        .unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokens_cover_the_source() {
        let src = "SELECT a, 'it''s' /* x */ FROM t -- done\n;";
        let tokens = lex(src);
        let rebuilt: String = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(rebuilt, src);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn offsets_are_monotonic() {
        let tokens = lex("SELECT 1 + 2 FROM \"T\" WHERE x <> 3;");
        for pair in tokens.windows(2) {
            assert!(pair[0].end_offset() <= pair[1].offset);
        }
    }

    #[test]
    fn keywords_resolve_through_the_profile() {
        let tokens = lex("select Foo");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].upper, "SELECT");
        assert_eq!(tokens[0].value, "select");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].upper, "FOO");
    }

    #[test_case("'a'" ; "plain")]
    #[test_case("'it''s'" ; "doubled quote")]
    #[test_case("E'a\\'b'" ; "c style escape")]
    #[test_case("N'text'" ; "national")]
    #[test_case("U&'d\\0061t'" ; "unicode")]
    #[test_case("X'deadbeef'" ; "hex string")]
    #[test_case("$$body$$" ; "dollar empty tag")]
    #[test_case("$fn$ select 1 $fn$" ; "dollar named tag")]
    #[test_case("q'[any ' text]'" ; "oracle brackets")]
    #[test_case("q'{curly}'" ; "oracle braces")]
    fn single_string_token(src: &str) {
        let tokens = lex(src);
        assert_eq!(kinds(&tokens), vec![TokenKind::String, TokenKind::Eof]);
        assert_eq!(tokens[0].value, src);
    }

    #[test]
    fn charset_introducer_is_one_token() {
        let tokens = lex_with("_binary'abc'", Dialect::Mysql);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value, "_binary'abc'");
    }

    #[test]
    fn mysql_backslash_escape_in_plain_string() {
        let tokens = lex_with(r"'a\'b'", Dialect::Mysql);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value, r"'a\'b'");
    }

    #[test]
    fn unterminated_string_reports_opening_offset() {
        let err = tokenize("SELECT 'oops", &TokenizeOptions::default()).unwrap_err();
        match err {
            Error::Tokenize(e) => {
                assert_eq!(e.kind, TokenizeErrorKind::UnterminatedString);
                assert_eq!(e.offset, 7);
                assert_eq!((e.line, e.column), (1, 8));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn nested_block_comments() {
        let src = "/* a /* b */ c */";
        let tokens = lex(src);
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[0].value, src);
    }

    #[test]
    fn unterminated_block_comment_errors() {
        let err = tokenize("/* never closed", &TokenizeOptions::default()).unwrap_err();
        match err {
            Error::Tokenize(e) => assert_eq!(e.kind, TokenizeErrorKind::UnterminatedBlockComment),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn hash_comments_only_in_mysql() {
        let mysql = lex_with("# note\nSELECT 1", Dialect::Mysql);
        assert_eq!(mysql[0].kind, TokenKind::LineComment);
        let pg = lex_with("a # b", Dialect::Postgres);
        assert_eq!(pg[2].kind, TokenKind::Operator);
        assert_eq!(pg[2].value, "#");
    }

    #[test]
    fn meta_commands_lex_as_line_comments() {
        let tokens = lex("\\gset foo\nSELECT 1");
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[0].value, "\\gset foo");
    }

    #[test_case("0x1F", "0x1F" ; "hex")]
    #[test_case("0b1010", "0b1010" ; "binary")]
    #[test_case("1.5e-3", "1.5e-3" ; "scientific")]
    #[test_case("10ms", "10ms" ; "millis suffix")]
    #[test_case("5y", "5y" ; "year suffix")]
    #[test_case(".5", ".5" ; "leading dot")]
    fn number_forms(src: &str, expected: &str) {
        let tokens = lex(src);
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].value, expected);
    }

    #[test]
    fn member_access_is_not_a_decimal() {
        let tokens = lex("t.5");
        assert_eq!(kinds(&tokens)[..3].to_vec(), vec![
            TokenKind::Identifier,
            TokenKind::Punctuation,
            TokenKind::Number,
        ]);
    }

    #[test]
    fn alias_after_number_is_identifier() {
        let tokens = lex("SELECT 1 mn");
        let words: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).collect();
        assert_eq!(words[1].kind, TokenKind::Number);
        assert_eq!(words[1].value, "1");
        assert_eq!(words[2].kind, TokenKind::Identifier);
    }

    #[test_case("->>" ; "json text arrow")]
    #[test_case("#>>" ; "hash path text")]
    #[test_case("!~*" ; "not regex ci")]
    #[test_case("::" ; "cast")]
    #[test_case("<@" ; "contained")]
    #[test_case("?|" ; "any key")]
    fn greedy_operators(op: &str) {
        let tokens = lex(op);
        assert_eq!(tokens[0].kind, TokenKind::Operator);
        assert_eq!(tokens[0].value, op);
    }

    #[test]
    fn tsql_bracket_identifier() {
        let tokens = lex_with("[My Table]", Dialect::Tsql);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].value, "[My Table]");
        // Outside T-SQL a bracket is subscript punctuation.
        let pg = lex_with("a[1]", Dialect::Postgres);
        assert!(pg[1].is_punct("["));
    }

    #[test]
    fn tsql_template_placeholder() {
        let tokens = lex_with("<Database_Name, sysname, master>", Dialect::Tsql);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].value, "<Database_Name, sysname, master>");
    }

    #[test]
    fn variables_and_placeholders_survive() {
        let tokens = lex_with("@name @@ROWCOUNT", Dialect::Tsql);
        assert_eq!(tokens[0].value, "@name");
        assert_eq!(tokens[2].value, "@@ROWCOUNT");
        let pg = lex(":param :'quoted' $1 ?");
        let sig: Vec<_> = pg.iter().filter(|t| !t.kind.is_trivia()).collect();
        assert_eq!(sig[0].value, ":param");
        assert_eq!(sig[1].value, ":'quoted'");
        assert_eq!(sig[2].value, "$1");
        assert_eq!(sig[3].kind, TokenKind::Operator);
    }

    #[test]
    fn token_limit_is_enforced() {
        let err = tokenize(
            "a b c d e",
            &TokenizeOptions {
                max_token_count: 3,
                ..TokenizeOptions::default()
            },
        )
        .unwrap_err();
        match err {
            Error::Tokenize(e) => {
                assert_eq!(e.kind, TokenizeErrorKind::TokenLimitExceeded(3));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn identifier_length_cap() {
        let long = "x".repeat(MAX_IDENTIFIER_BYTES + 1);
        let err = tokenize(&long, &TokenizeOptions::default()).unwrap_err();
        match err {
            Error::Tokenize(e) => assert_eq!(e.kind, TokenizeErrorKind::IdentifierTooLong),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn input_size_guard() {
        let err = tokenize(
            "SELECT 1",
            &TokenizeOptions {
                max_input_size: 4,
                ..TokenizeOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::InputTooLarge { size: 8, .. }));
    }
}
