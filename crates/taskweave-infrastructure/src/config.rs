//! Platform configuration.
//!
//! Credentials and settings are read from `~/.config/taskweave/config.toml`,
//! with environment variables filling any value the file does not provide.
//! The loaded configuration is passed explicitly into capability
//! constructors; nothing reads the environment at call time.
//!
//! ```toml
//! data_dir = "/var/lib/taskweave"   # optional
//!
//! [openai]
//! api_key = "sk-..."
//! model = "gpt-4o"                  # optional
//!
//! [tavily]
//! api_key = "tvly-..."
//! ```

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use taskweave_core::error::{Result, WeaveError};

use crate::paths::WeavePaths;

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Tavily API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TavilyConfig {
    pub api_key: String,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
    #[serde(default)]
    pub tavily: Option<TavilyConfig>,
    /// Where task snapshots are stored. Defaults to `~/.taskweave`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl PlatformConfig {
    /// Loads configuration from the default file location, then fills gaps
    /// from the environment (`OPENAI_API_KEY`, `OPENAI_MODEL_NAME`,
    /// `TAVILY_API_KEY`, `TASKWEAVE_DATA_DIR`).
    ///
    /// A missing file is not an error; an unreadable or unparsable file is.
    pub fn load() -> Result<Self> {
        let path = WeavePaths::config_file()
            .map_err(|err| WeaveError::config(err.to_string()))?;

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|err| {
                WeaveError::config(format!(
                    "Failed to read configuration file at {}: {err}",
                    path.display()
                ))
            })?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        config.fill_from(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parses a configuration document without touching the filesystem.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Fills missing values from the given lookup (environment variables in
    /// production). File values win over environment values.
    fn fill_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.openai.is_none() {
            if let Some(api_key) = lookup("OPENAI_API_KEY") {
                self.openai = Some(OpenAiConfig {
                    api_key,
                    model: lookup("OPENAI_MODEL_NAME"),
                });
            }
        }
        if self.tavily.is_none() {
            if let Some(api_key) = lookup("TAVILY_API_KEY") {
                self.tavily = Some(TavilyConfig { api_key });
            }
        }
        if self.data_dir.is_none() {
            self.data_dir = lookup("TASKWEAVE_DATA_DIR").map(PathBuf::from);
        }
    }

    /// The effective data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => WeavePaths::default_data_dir()
                .map_err(|err| WeaveError::config(err.to_string())),
        }
    }

    /// The OpenAI section, or a config error naming what is missing.
    pub fn require_openai(&self) -> Result<&OpenAiConfig> {
        self.openai.as_ref().ok_or_else(|| {
            WeaveError::config(
                "OpenAI credentials not found in config.toml or OPENAI_API_KEY",
            )
        })
    }

    /// The Tavily section, or a config error naming what is missing.
    pub fn require_tavily(&self) -> Result<&TavilyConfig> {
        self.tavily.as_ref().ok_or_else(|| {
            WeaveError::config(
                "Tavily credentials not found in config.toml or TAVILY_API_KEY",
            )
        })
    }
}
