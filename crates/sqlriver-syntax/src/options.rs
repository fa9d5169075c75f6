//! Caller-facing options for tokenizing and parsing.

use std::borrow::Cow;
use std::fmt;

use crate::ast::Statement;
use crate::dialect::{Dialect, DialectProfile};
use crate::parser::ParseError;

pub const DEFAULT_MAX_DEPTH: usize = 200;
pub const DEFAULT_MAX_TOKEN_COUNT: usize = 1_000_000;
pub const DEFAULT_MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

/// Options for [`crate::tokenize`].
#[derive(Debug, Clone)]
pub struct TokenizeOptions {
    pub dialect: Dialect,
    pub max_token_count: usize,
    pub max_input_size: usize,
    /// Lex psql `\meta` commands as line comments instead of rejecting `\`.
    pub allow_meta_commands: bool,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Ansi,
            max_token_count: DEFAULT_MAX_TOKEN_COUNT,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            allow_meta_commands: true,
        }
    }
}

/// Position context handed to the recovery hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverContext {
    /// Index of the statement being recovered, in output order.
    pub statement_index: usize,
    /// Statements produced so far, including the recovered one.
    pub total_statements: usize,
}

pub type OnRecover = Box<dyn FnMut(&ParseError, Option<&Statement>, RecoverContext)>;
pub type OnDropStatement = Box<dyn FnMut(&ParseError, RecoverContext)>;

/// Options for [`crate::parse`].
pub struct ParseOptions {
    /// Convert unparseable statements into raw passthrough nodes instead of
    /// failing the whole parse.
    pub recover: bool,
    /// Hard ceiling on expression/query nesting. Exceeding it is an error
    /// even under `recover`.
    pub max_depth: usize,
    pub dialect: Dialect,
    /// Extra clause keywords merged (uppercased) into the active profile.
    pub extra_clause_keywords: Vec<String>,
    pub max_token_count: usize,
    pub max_input_size: usize,
    pub allow_meta_commands: bool,
    /// Called after a statement is recovered into a raw node.
    pub on_recover: Option<OnRecover>,
    /// Called when a recovered region contained no text at all.
    pub on_drop_statement: Option<OnDropStatement>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recover: true,
            max_depth: DEFAULT_MAX_DEPTH,
            dialect: Dialect::Ansi,
            extra_clause_keywords: Vec::new(),
            max_token_count: DEFAULT_MAX_TOKEN_COUNT,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            allow_meta_commands: true,
            on_recover: None,
            on_drop_statement: None,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("recover", &self.recover)
            .field("max_depth", &self.max_depth)
            .field("dialect", &self.dialect)
            .field("extra_clause_keywords", &self.extra_clause_keywords)
            .field("max_token_count", &self.max_token_count)
            .field("max_input_size", &self.max_input_size)
            .field("allow_meta_commands", &self.allow_meta_commands)
            .field("on_recover", &self.on_recover.as_ref().map(|_| ".."))
            .field(
                "on_drop_statement",
                &self.on_drop_statement.as_ref().map(|_| ".."),
            )
            .finish()
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn recover(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn on_recover(mut self, hook: OnRecover) -> Self {
        self.on_recover = Some(hook);
        self
    }

    pub fn on_drop_statement(mut self, hook: OnDropStatement) -> Self {
        self.on_drop_statement = Some(hook);
        self
    }

    pub(crate) fn tokenize_options(&self) -> TokenizeOptions {
        TokenizeOptions {
            dialect: self.dialect,
            max_token_count: self.max_token_count,
            max_input_size: self.max_input_size,
            allow_meta_commands: self.allow_meta_commands,
        }
    }

    /// The active profile: the built-in one, or a derived copy when extra
    /// clause keywords were supplied.
    pub(crate) fn resolve_profile(&self) -> Cow<'static, DialectProfile> {
        let base = self.dialect.profile();
        if self.extra_clause_keywords.is_empty() {
            Cow::Borrowed(base)
        } else {
            Cow::Owned(base.with_clause_keywords(self.extra_clause_keywords.iter()))
        }
    }
}
