use clap::Parser;
use sqlriver_cli::{
    args::{Colors, SqlriverArgs},
    config::Config,
    CheckFailed, Sqlriver,
};
use std::process::exit;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = SqlriverArgs::parse();
    setup_stderr_logging(cli.verbose, &cli.colors);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "failed to load configuration");
            exit(1);
        }
    };

    match Sqlriver::new(config).execute(cli) {
        Ok(()) => exit(0),
        Err(error) => {
            if error.is::<CheckFailed>() {
                tracing::error!("{error}");
                exit(2);
            }
            tracing::error!(error = %format!("{error:#}"), "operation failed");
            exit(1);
        }
    }
}

fn setup_stderr_logging(verbose: bool, colors: &Colors) {
    let ansi = match colors {
        Colors::Auto => atty::is(atty::Stream::Stderr),
        Colors::Always => true,
        Colors::Never => false,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .init();
}
