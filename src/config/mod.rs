//! Run configuration.
//!
//! A `Config` is resolved once at startup from, in increasing precedence:
//! built-in defaults, the optional TOML file, the environment and the
//! command line. Validation happens during resolution, so holding a `Config`
//! means the run may start talking to the network.

mod credentials;
mod file;

use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

pub use credentials::{Credentials, EMAIL_VAR, TOKEN_VAR};
pub use file::{default_path, FileConfig, SearchSection};

/// Environment variable holding the JIRA instance URL.
pub const BASE_URL_VAR: &str = "JIRA_BASE_URL";

/// Default report file name.
pub const DEFAULT_OUTPUT: &str = "consolidated_report.xlsx";

/// Default issues per search page; also the server maximum.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default per-project safety cap.
pub const DEFAULT_SAFETY_CAP: usize = 50_000;

/// Default attempts per request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Issue types extracted unless configured otherwise.
pub const DEFAULT_ISSUE_TYPES: &[&str] = &[
    "Test",
    "Test Execution",
    "Test plan",
    "Test set",
    "Precondition",
    "Bug",
];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required credentials are absent.
    #[error("Missing JIRA credentials: set {0}")]
    MissingCredentials(String),

    /// A value failed validation.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub output: Option<PathBuf>,
    pub projects: Option<Vec<String>>,
}

/// Fully resolved and validated settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// JIRA base URL without trailing slash.
    pub base_url: String,
    /// Authentication pair.
    pub credentials: Credentials,
    /// Report file to write.
    pub output: PathBuf,
    /// Issue type whitelist for the filter expression.
    pub issue_types: Vec<String>,
    /// Issues requested per page.
    pub page_size: u32,
    /// Maximum issues kept per project.
    pub safety_cap: usize,
    /// Attempts per request, including the first.
    pub max_attempts: u32,
    /// Restrict the sweep to these project keys; empty means all.
    pub projects: Vec<String>,
}

impl Config {
    /// Resolve configuration from the file, the process environment and
    /// command-line overrides.
    pub fn load(file: FileConfig, overrides: Overrides) -> Result<Self> {
        Self::resolve(file, |name| std::env::var(name).ok(), overrides)
    }

    /// Resolve configuration with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` when the email or token is absent and
    /// `ValidationError` for any other unusable value.
    pub fn resolve<F>(file: FileConfig, env: F, overrides: Overrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::require(env(EMAIL_VAR).or(file.email), env(TOKEN_VAR))?;

        let base_url = overrides
            .base_url
            .or_else(|| env(BASE_URL_VAR))
            .or(file.base_url)
            .ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "JIRA base URL is not set (use --base-url, {} or the config file)",
                    BASE_URL_VAR
                ))
            })?;

        let search = file.search;
        let config = Self {
            base_url: normalize_base_url(&base_url),
            credentials,
            output: overrides
                .output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            issue_types: search
                .issue_types
                .unwrap_or_else(|| DEFAULT_ISSUE_TYPES.iter().map(|t| t.to_string()).collect()),
            page_size: search.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            safety_cap: search.safety_cap.unwrap_or(DEFAULT_SAFETY_CAP),
            max_attempts: search.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            projects: overrides
                .projects
                .or(file.projects)
                .unwrap_or_default()
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the resolved values.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "base URL '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if !self.credentials.email().contains('@') {
            return Err(ConfigError::ValidationError(format!(
                "'{}' does not appear to be a valid email address",
                self.credentials.email()
            )));
        }

        if self.page_size == 0 || self.page_size > DEFAULT_PAGE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "page size must be between 1 and {}, got {}",
                DEFAULT_PAGE_SIZE, self.page_size
            )));
        }

        if self.safety_cap == 0 {
            return Err(ConfigError::ValidationError(
                "safety cap must be greater than zero".to_string(),
            ));
        }

        if self.issue_types.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "issue type whitelist cannot be empty".to_string(),
            ));
        }

        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "output path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    if url.starts_with("http://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}
