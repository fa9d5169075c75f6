#![warn(clippy::pedantic)]
#![allow(
    clippy::enum_glob_use,
    clippy::match_same_arms,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::too_many_lines,
    clippy::wildcard_imports,
    clippy::missing_errors_doc,
    clippy::uninlined_format_args
)]

//! River-aligned rendering of the sqlriver AST.
//!
//! Within a statement the first word of every clause keyword is
//! right-aligned to a common column (the "river"); clause payloads start one
//! space after it and list continuations indent past it:
//!
//! ```text
//! SELECT id,
//!        name
//!   FROM users
//!  WHERE deleted_at IS NULL
//!  ORDER BY id
//! ```

mod expr;
mod flat;
mod stmt;
mod util;

pub mod options;

pub use options::Options;

use sqlriver_syntax::ast::Statement;
use sqlriver_syntax::ParseOptions;

use std::io::{self, Write};

/// Streaming statement printer.
pub struct Formatter<W: Write> {
    pub(crate) out: W,
    pub(crate) options: Options,
}

impl<W: Write> Formatter<W> {
    pub fn new(out: W) -> Self {
        Self::new_with_options(out, Options::default())
    }

    pub fn new_with_options(out: W, options: Options) -> Self {
        Self { out, options }
    }

    /// Render a statement sequence, preserving blank lines between
    /// statements up to `max_empty_lines`.
    pub fn format(&mut self, statements: &[Statement]) -> io::Result<()> {
        for (idx, statement) in statements.iter().enumerate() {
            if idx > 0 {
                let blanks = (statement.blank_lines_before as u64).min(self.options.max_empty_lines);
                for _ in 0..blanks {
                    self.newline()?;
                }
            }
            self.fmt_statement(statement)?;
        }
        Ok(())
    }

    pub(crate) fn newline(&mut self) -> io::Result<()> {
        if self.options.crlf {
            self.out.write_all(b"\r\n")
        } else {
            self.out.write_all(b"\n")
        }
    }

    pub(crate) fn line(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.trim_end().as_bytes())?;
        self.newline()
    }
}

/// Render already-parsed statements to a string.
pub fn format_statements(statements: &[Statement], options: &Options) -> String {
    let mut out = Vec::new();
    Formatter::new_with_options(&mut out, options.clone())
        .format(statements)
        .expect("writing to a Vec cannot fail");
    String::from_utf8(out).expect("the printer only emits UTF-8")
}

/// Parse `src` (recovering unparseable statements as raw passthrough) and
/// render the canonical form.
pub fn format_source(
    src: &str,
    options: &Options,
    parse_options: ParseOptions,
) -> Result<String, sqlriver_syntax::Error> {
    let statements = sqlriver_syntax::parse(src, parse_options)?;
    Ok(format_statements(&statements, options))
}
