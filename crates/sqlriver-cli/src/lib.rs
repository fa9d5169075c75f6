pub mod args;
pub mod config;
mod execute;

use config::Config;

/// A formatting difference was found in `--check` mode; mapped to a
/// distinct exit code by the binary.
#[derive(Debug, thiserror::Error)]
#[error("some files were not properly formatted")]
pub struct CheckFailed;

pub struct Sqlriver {
    pub(crate) colors: bool,
    pub(crate) config: Config,
}

impl Sqlriver {
    pub fn new(config: Config) -> Self {
        Self {
            colors: false,
            config,
        }
    }
}
