use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::{
    self,
    termcolor::{ColorChoice, StandardStream},
};
use sqlriver_syntax::ast::{RawReason, Statement};
use sqlriver_syntax::{Dialect, Error, ParseOptions};

use crate::{args::FmtCommand, CheckFailed, Sqlriver};

impl Sqlriver {
    pub(crate) fn execute_fmt(&mut self, cmd: &FmtCommand) -> Result<(), anyhow::Error> {
        let dialect = self.resolve_dialect(cmd.dialect.as_deref())?;
        let mut format_opts = sqlriver_fmt::Options::default();
        format_opts.update(self.config.fmt.options.clone());

        if cmd.files.is_empty() || cmd.files == ["-"] {
            return self.fmt_stdin(cmd, dialect, &format_opts);
        }

        let files = collect_files(&cmd.files)?;
        if files.is_empty() {
            return Err(anyhow!("no files matched the given patterns"));
        }

        let mut result = Ok(());
        let mut check_failed = false;

        for path in files {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;

            let statements = match sqlriver_syntax::parse(&source, parse_options(dialect)) {
                Ok(statements) => statements,
                Err(error) => {
                    self.print_syntax_error(&path.to_string_lossy(), &source, &error)?;
                    result = Err(anyhow!("some files had syntax errors"));
                    continue;
                }
            };

            if cmd.strict && !cmd.force {
                let recovered = count_recovered(&statements);
                if recovered > 0 {
                    tracing::error!(
                        path = %path.display(),
                        recovered,
                        "refusing to format a file with unparseable statements"
                    );
                    result = Err(anyhow!("some files contained unparseable statements"));
                    continue;
                }
            }

            let formatted = sqlriver_fmt::format_statements(&statements, &format_opts);

            if source != formatted {
                if cmd.check {
                    tracing::error!(path = %path.display(), "the file is not properly formatted");
                    check_failed = true;
                } else {
                    std::fs::write(&path, formatted.as_bytes())
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }
            }
        }

        if check_failed {
            return Err(CheckFailed.into());
        }
        result
    }

    fn fmt_stdin(
        &mut self,
        cmd: &FmtCommand,
        dialect: Dialect,
        format_opts: &sqlriver_fmt::Options,
    ) -> Result<(), anyhow::Error> {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read standard input")?;
        let statements = match sqlriver_syntax::parse(&source, parse_options(dialect)) {
            Ok(statements) => statements,
            Err(error) => {
                self.print_syntax_error("<stdin>", &source, &error)?;
                return Err(anyhow!("standard input had syntax errors"));
            }
        };
        if cmd.strict && count_recovered(&statements) > 0 {
            return Err(anyhow!("standard input contained unparseable statements"));
        }
        let formatted = sqlriver_fmt::format_statements(&statements, format_opts);
        if cmd.check {
            if source == formatted {
                return Ok(());
            }
            return Err(CheckFailed.into());
        }
        print!("{formatted}");
        Ok(())
    }

    pub(crate) fn resolve_dialect(
        &self,
        explicit: Option<&str>,
    ) -> Result<Dialect, anyhow::Error> {
        let name = explicit.or(self.config.dialect.as_deref());
        match name {
            Some(name) => Dialect::from_str(name).map_err(Into::into),
            None => Ok(Dialect::Ansi),
        }
    }

    pub(crate) fn print_syntax_error(
        &self,
        name: &str,
        source: &str,
        error: &Error,
    ) -> Result<(), anyhow::Error> {
        let file = SimpleFile::new(name, source);
        let offset = match error {
            Error::Tokenize(e) => e.offset,
            Error::Parse(e) => e.offset,
            Error::InputTooLarge { .. } => 0,
        };
        let end = (offset + 1).min(source.len());
        let diagnostic: Diagnostic<()> = Diagnostic::error()
            .with_message(error.to_string())
            .with_labels(vec![Label::primary((), offset..end)]);
        let color_choice = if self.colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let writer = StandardStream::stderr(color_choice);
        term::emit(
            &mut writer.lock(),
            &term::Config::default(),
            &file,
            &diagnostic,
        )?;
        Ok(())
    }
}

pub(crate) fn parse_options(dialect: Dialect) -> ParseOptions {
    let mut options = ParseOptions::default();
    options.dialect = dialect;
    options
}

fn count_recovered(statements: &[Statement]) -> usize {
    statements
        .iter()
        .filter(|s| {
            s.as_raw()
                .is_some_and(|raw| raw.reason == RawReason::ParseError)
        })
        .count()
}

fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>, anyhow::Error> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let nested = format!("{}/**/*.sql", pattern.trim_end_matches('/'));
            expand_glob(&nested, &mut files)?;
            continue;
        }
        expand_glob(pattern, &mut files)?;
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn expand_glob(pattern: &str, files: &mut Vec<PathBuf>) -> Result<(), anyhow::Error> {
    for entry in glob::glob(pattern).with_context(|| format!("invalid glob {pattern:?}"))? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
