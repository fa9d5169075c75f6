use crate::{
    args::{Colors, RootCommand, SqlriverArgs},
    Sqlriver,
};

mod fmt;
mod tokens;

impl Sqlriver {
    pub fn execute(&mut self, args: SqlriverArgs) -> Result<(), anyhow::Error> {
        self.colors = match args.colors {
            Colors::Auto => atty::is(atty::Stream::Stderr),
            Colors::Always => true,
            Colors::Never => false,
        };

        match args.cmd {
            RootCommand::Fmt(cmd) => self.execute_fmt(&cmd),
            RootCommand::Tokens(cmd) => self.execute_tokens(&cmd),
        }
    }
}
