//! JIRA credential pair.

use std::fmt;

use super::{ConfigError, Result};

/// Environment variable holding the account email.
pub const EMAIL_VAR: &str = "JIRA_EMAIL";

/// Environment variable holding the API token.
pub const TOKEN_VAR: &str = "JIRA_API_TOKEN";

/// The email + API token pair used for Basic authentication.
///
/// The token never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    token: String,
}

impl Credentials {
    /// Create credentials without validation.
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
        }
    }

    /// Build credentials from optional sources, failing if either half is
    /// absent or blank.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` naming every missing variable.
    pub fn require(email: Option<String>, token: Option<String>) -> Result<Self> {
        let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        let token = token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

        match (email, token) {
            (Some(email), Some(token)) => Ok(Self { email, token }),
            (email, token) => {
                let mut missing = Vec::new();
                if email.is_none() {
                    missing.push(EMAIL_VAR);
                }
                if token.is_none() {
                    missing.push(TOKEN_VAR);
                }
                Err(ConfigError::MissingCredentials(missing.join(", ")))
            }
        }
    }

    /// The account email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The API token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_both_present() {
        let creds =
            Credentials::require(Some("qa@bank.com".into()), Some(" tok ".into())).unwrap();
        assert_eq!(creds.email(), "qa@bank.com");
        assert_eq!(creds.token(), "tok");
    }

    #[test]
    fn test_require_missing_token() {
        let err = Credentials::require(Some("qa@bank.com".into()), None).unwrap_err();
        match err {
            ConfigError::MissingCredentials(names) => assert_eq!(names, "JIRA_API_TOKEN"),
            other => panic!("Expected MissingCredentials, got {:?}", other),
        }
    }

    #[test]
    fn test_require_blank_values_count_as_missing() {
        let err = Credentials::require(Some("   ".into()), Some(String::new())).unwrap_err();
        assert!(err.to_string().contains("JIRA_EMAIL, JIRA_API_TOKEN"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("qa@bank.com", "super-secret");
        let debug_output = format!("{:?}", creds);
        assert!(debug_output.contains("qa@bank.com"));
        assert!(!debug_output.contains("super-secret"));
    }
}
