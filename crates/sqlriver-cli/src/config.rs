//! `sqlriver.toml` configuration loading.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlriver_fmt::options::OptionsIncomplete;

pub const CONFIG_FILE_NAME: &str = "sqlriver.toml";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default dialect for files without an explicit `--dialect`.
    pub dialect: Option<String>,
    pub fmt: FmtConfig,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FmtConfig {
    pub options: OptionsIncomplete,
}

impl Config {
    /// Load from an explicit path, or from the closest `sqlriver.toml`
    /// walking up from the working directory. Absence is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, anyhow::Error> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file()?,
        };
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

fn find_config_file() -> Result<Option<PathBuf>, anyhow::Error> {
    let mut dir = std::env::current_dir().context("invalid working directory")?;
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
        if !dir.pop() {
            return Ok(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_options_deserialize() {
        let config: Config = toml::from_str(
            r#"
dialect = "postgres"

[fmt.options]
uppercase_keywords = false
max_empty_lines = 1
"#,
        )
        .unwrap();
        assert_eq!(config.dialect.as_deref(), Some("postgres"));
        assert_eq!(config.fmt.options.uppercase_keywords, Some(false));
        assert_eq!(config.fmt.options.max_empty_lines, Some(1));
        assert_eq!(config.fmt.options.crlf, None);
    }

    #[test]
    fn empty_config_is_fine() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.dialect.is_none());
        assert!(config.fmt.options.indent_string.is_none());
    }
}
