use std::path::PathBuf;

use clap::{crate_version, ArgEnum, Args, Parser, Subcommand};

#[derive(Clone, Parser)]
#[clap(name = "sqlriver")]
#[clap(bin_name = "sqlriver")]
#[clap(version = crate_version!())]
pub struct SqlriverArgs {
    #[clap(long, arg_enum, global = true, default_value = "auto")]
    pub colors: Colors,
    /// Enable a verbose logging format.
    #[clap(long, global = true)]
    pub verbose: bool,
    /// Configuration file to use instead of the closest `sqlriver.toml`.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    #[clap(subcommand)]
    pub cmd: RootCommand,
}

#[derive(Clone, Subcommand)]
pub enum RootCommand {
    /// Format SQL files in place, or standard input onto standard output.
    Fmt(FmtCommand),
    /// Dump the token stream of a file as JSON lines.
    Tokens(TokensCommand),
}

#[derive(Clone, Args)]
pub struct FmtCommand {
    /// Files or glob patterns to format; `-` or no files reads standard
    /// input and writes the result to standard output.
    pub files: Vec<String>,
    /// Verify formatting without writing any file.
    #[clap(long)]
    pub check: bool,
    /// SQL dialect to parse with (ansi, postgres, mysql, tsql).
    #[clap(long)]
    pub dialect: Option<String>,
    /// Format even when some statements could only be kept verbatim.
    #[clap(long)]
    pub force: bool,
    /// Refuse to format files containing unparseable statements.
    #[clap(long, conflicts_with = "force")]
    pub strict: bool,
}

#[derive(Clone, Args)]
pub struct TokensCommand {
    /// The SQL file to tokenize.
    pub file: PathBuf,
    /// SQL dialect to lex with (ansi, postgres, mysql, tsql).
    #[clap(long)]
    pub dialect: Option<String>,
}

#[derive(Clone, Copy, ArgEnum)]
pub enum Colors {
    /// Determine whether to colorize output automatically.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}
