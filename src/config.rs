use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Site name shown in the page title and header
    #[serde(default = "default_name")]
    pub name: String,
    /// Maximum number of items in the rendered digest
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Template override; empty means the built-in page
    #[serde(default)]
    pub template: PathBuf,
    #[serde(default)]
    pub stylesheet: String,
    #[serde(default)]
    pub allow_images: bool,
    /// Number of feeds fetched at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Feed sources appended after the command line ones
    #[serde(default)]
    pub feeds: Vec<String>,
}

fn default_name() -> String {
    "Feed digest".to_string()
}

fn default_limit() -> usize {
    49
}

fn default_concurrency() -> usize {
    4
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("feed-digest/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            limit: default_limit(),
            template: PathBuf::new(),
            stylesheet: String::new(),
            allow_images: false,
            concurrency: default_concurrency(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            feeds: Vec::new(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::Config("limit must be a positive integer".into()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config(
                "concurrency must be a positive integer".into(),
            ));
        }
        Ok(())
    }

    pub fn uses_builtin_template(&self) -> bool {
        self.template.as_os_str().is_empty()
    }
}
