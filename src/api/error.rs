//! API error types for the JIRA client.

use thiserror::Error;

/// Errors that can occur when talking to the JIRA REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed - invalid email or API token.
    #[error("Authentication failed: check your email and API token")]
    Unauthorized,

    /// Permission denied - the caller lacks access to the resource.
    #[error("Permission denied: you don't have access to this resource")]
    Forbidden,

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited by the JIRA API.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// JIRA server error (HTTP 5xx).
    #[error("JIRA server error: {0}")]
    ServerError(String),

    /// Any other non-success status, e.g. a 400 for a rejected query.
    /// Repeating the same request would get the same answer.
    #[error("Request rejected: {0}")]
    UnexpectedStatus(String),

    /// Network or HTTP transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be parsed.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::UnexpectedStatus(format!("HTTP {}: {}", status, context)),
        }
    }

    /// Whether the server refused access (HTTP 401 or 403).
    ///
    /// A project whose search is refused contributes no issues at all.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Forbidden)
    }

    /// Whether the failure is transient and worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimited | ApiError::ServerError(_) | ApiError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_from_status_401() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "test");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_error_from_status_403() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, "test");
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn test_error_from_status_404() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "project GDP");
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "project GDP"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_error_from_status_429() {
        let err = ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "test");
        assert!(matches!(err, ApiError::RateLimited));
    }

    #[test]
    fn test_error_from_status_400_is_not_a_server_error() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "bad jql");
        match err {
            ApiError::UnexpectedStatus(msg) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("bad jql"));
            }
            other => panic!("Expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_error_from_status_5xx() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "proxy");
        assert!(matches!(err, ApiError::ServerError(ref msg) if msg.contains("502")));
    }

    #[test]
    fn test_access_denied_covers_401_and_403_only() {
        assert!(ApiError::Unauthorized.is_access_denied());
        assert!(ApiError::Forbidden.is_access_denied());
        assert!(!ApiError::RateLimited.is_access_denied());
        assert!(!ApiError::NotFound("x".to_string()).is_access_denied());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ApiError::RateLimited.is_retryable());
        assert!(ApiError::ServerError("boom".to_string()).is_retryable());
        assert!(ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, "x").is_retryable());

        assert!(!ApiError::from_status(StatusCode::BAD_REQUEST, "jql").is_retryable());
        assert!(!ApiError::from_status(StatusCode::CONFLICT, "x").is_retryable());
        assert!(!ApiError::NotFound("x".to_string()).is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(!ApiError::Forbidden.is_retryable());
        assert!(!ApiError::InvalidResponse("eof".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Unauthorized;
        assert_eq!(
            err.to_string(),
            "Authentication failed: check your email and API token"
        );

        let err = ApiError::InvalidResponse("missing issues".to_string());
        assert_eq!(err.to_string(), "Invalid API response: missing issues");
    }
}
