//! Centralized error types for jira-sweep.
//!
//! Only errors that end the run surface here. Catalog, project and field
//! failures are absorbed by the sweep itself and never reach this type.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;
use crate::report::ReportError;

/// Exit code for configuration problems detected before any network call.
pub const EXIT_CONFIG: i32 = 2;

/// Exit code for unexpected failures.
pub const EXIT_FAILURE: i32 = 1;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Report sink errors.
    #[error("{0}")]
    Report(#[from] ReportError),
}

impl AppError {
    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::MissingCredentials(vars) => {
                    format!("Missing JIRA credentials. Set {} and run again.", vars)
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::ReadError { path, .. } => format!(
                    "Could not read configuration file {}. Check that it exists and is readable.",
                    path.display()
                ),
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
            },
            AppError::Api(e) => match e {
                ApiError::Unauthorized => {
                    "Authentication failed. Please check your email and API token.".to_string()
                }
                ApiError::Forbidden => {
                    "Access denied. You don't have permission to access this resource.".to_string()
                }
                ApiError::Network(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                other => other.to_string(),
            },
            AppError::Report(ReportError::Locked(path)) => format!(
                "Close the Excel file before running ({} is locked).",
                path.display()
            ),
            AppError::Report(e) => format!("Could not save the report: {}", e),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::MissingCredentials(_)) => Some(
                "Create an API token at https://id.atlassian.com/manage-profile/security/api-tokens",
            ),
            AppError::Config(ConfigError::ParseError(_)) => {
                Some("Compare your config.toml with the documented keys.")
            }
            AppError::Api(ApiError::Unauthorized) => {
                Some("Check your API token at https://id.atlassian.com/manage-profile/security/api-tokens")
            }
            AppError::Report(ReportError::Locked(_)) => {
                Some("Close the spreadsheet or choose another file with --output.")
            }
            _ => None,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
