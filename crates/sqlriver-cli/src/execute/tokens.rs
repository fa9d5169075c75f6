use std::io::Write;

use anyhow::Context;
use sqlriver_syntax::TokenizeOptions;

use crate::{args::TokensCommand, Sqlriver};

impl Sqlriver {
    pub(crate) fn execute_tokens(&mut self, cmd: &TokensCommand) -> Result<(), anyhow::Error> {
        let dialect = self.resolve_dialect(cmd.dialect.as_deref())?;
        let source = std::fs::read_to_string(&cmd.file)
            .with_context(|| format!("failed to read {}", cmd.file.display()))?;
        let tokens = match sqlriver_syntax::tokenize(
            &source,
            &TokenizeOptions {
                dialect,
                ..TokenizeOptions::default()
            },
        ) {
            Ok(tokens) => tokens,
            Err(error) => {
                self.print_syntax_error(&cmd.file.to_string_lossy(), &source, &error)?;
                return Err(anyhow::anyhow!("tokenization failed"));
            }
        };
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        for token in tokens {
            serde_json::to_writer(&mut lock, &token)?;
            writeln!(lock)?;
        }
        Ok(())
    }
}
