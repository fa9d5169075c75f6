#![warn(clippy::pedantic)]
#![allow(
    clippy::single_match,
    clippy::wildcard_imports,
    clippy::too_many_lines,
    clippy::enum_glob_use,
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    clippy::module_name_repetitions,
    clippy::single_match_else,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod ast;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod tokens;

pub use dialect::{Dialect, DialectProfile, StatementHandler};
pub use error::Error;
pub use lexer::{tokenize, TokenizeError, TokenizeErrorKind};
pub use options::{ParseOptions, RecoverContext, TokenizeOptions};
pub use parser::{parse, parse_statements, ParseError, ParseErrorKind};
pub use tokens::{Token, TokenKind};
