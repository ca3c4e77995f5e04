//! Optional TOML configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigError, Result};

/// Settings that may be stored on disk.
///
/// Every key is optional; anything left out falls back to the environment or
/// the built-in defaults. The API token is deliberately not accepted here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// The JIRA instance URL.
    pub base_url: Option<String>,
    /// The account email.
    pub email: Option<String>,
    /// Report file to write.
    pub output: Option<PathBuf>,
    /// Restrict the sweep to these project keys.
    pub projects: Option<Vec<String>>,
    /// Search tuning.
    #[serde(default)]
    pub search: SearchSection,
}

/// The `[search]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    /// Issue type whitelist.
    pub issue_types: Option<Vec<String>>,
    /// Issues per page (1..=100).
    pub page_size: Option<u32>,
    /// Hard per-project cap.
    pub safety_cap: Option<usize>,
    /// Attempts per request, including the first.
    pub max_attempts: Option<u32>,
}

impl FileConfig {
    /// Load the configuration file.
    ///
    /// With an explicit path the file must exist. Without one the default
    /// location is tried and a missing file yields the empty configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => {
                    debug!("No configuration file found, using environment and defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a configuration file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(ConfigError::ParseError)
    }
}

/// `<config_dir>/jira-sweep/config.toml`, if a config directory exists.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jira-sweep").join("config.toml"))
}
