//! Basic authentication for the JIRA API.
//!
//! JIRA Cloud accepts `email:api_token` encoded as HTTP Basic credentials.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::config::Credentials;

/// Pre-encoded authorization for every request of a run.
#[derive(Clone)]
pub struct Auth {
    /// The account the token belongs to.
    email: String,
    /// The complete `Basic ...` header value.
    auth_header: String,
}

impl Auth {
    /// Encode the credential pair once; the raw token is not kept.
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            email: credentials.email().to_string(),
            auth_header: build_auth_header(credentials.email(), credentials.token()),
        }
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the email address.
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("email", &self.email)
            .field("auth_header", &"<redacted>")
            .finish()
    }
}

/// Encodes "email:token" in Base64 and prepends "Basic ".
fn build_auth_header(email: &str, token: &str) -> String {
    let credentials = format!("{}:{}", email, token);
    format!("Basic {}", BASE64.encode(credentials.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_auth_header() {
        let header = build_auth_header("user@example.com", "api_token_here");
        assert!(header.starts_with("Basic "));

        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        let decoded_str = String::from_utf8(decoded).unwrap();
        assert_eq!(decoded_str, "user@example.com:api_token_here");
    }

    #[test]
    fn test_auth_from_credentials() {
        let credentials = Credentials::new("user@example.com", "secret_token");
        let auth = Auth::new(&credentials);
        assert_eq!(auth.email(), "user@example.com");
        assert!(auth.header_value().starts_with("Basic "));
    }

    #[test]
    fn test_auth_does_not_expose_token() {
        let auth = Auth::new(&Credentials::new("user@example.com", "secret_token"));
        let debug_output = format!("{:?}", auth);

        assert!(!debug_output.contains("secret_token"));
        assert!(!debug_output.contains(auth.header_value()));
    }
}
