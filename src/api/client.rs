//! JIRA API client implementation.
//!
//! This module provides the HTTP client used by the sweep. It handles
//! authentication, per-request timeouts, error mapping and bounded retry of
//! transient failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::source::{IssueSource, ProjectSearch, SearchRequest};
use super::types::{ProjectSummary, SearchPage};
use crate::config::Config;

/// Timeout for the project catalog request.
pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(20);

/// Timeout for each search page request.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for establishing a connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 1000;

/// The JIRA API client.
///
/// Each instance owns its own connection pool. `open_session` hands out a
/// fresh client per project so connections are reused within a project's
/// pagination but never across projects.
#[derive(Debug)]
pub struct JiraClient {
    /// The HTTP client.
    client: Client,
    /// The base URL for the JIRA instance, without trailing slash.
    base_url: String,
    /// Authentication credentials.
    auth: Auth,
    /// Attempts per request, including the first one.
    max_attempts: u32,
}

impl JiraClient {
    /// Create a client from validated configuration.
    ///
    /// Does not contact the server.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Self::build_http_client()?,
            base_url: config.base_url.clone(),
            auth: Auth::new(&config.credentials),
            max_attempts: config.max_attempts.max(1),
        })
    }

    /// Build the HTTP client with appropriate settings.
    fn build_http_client() -> Result<Client> {
        Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("jira-sweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)
    }

    /// List all projects visible to the authenticated user.
    ///
    /// Calls `GET /rest/api/3/project`.
    #[instrument(skip(self))]
    pub async fn get_projects(&self) -> Result<Vec<ProjectSummary>> {
        debug!("Listing projects visible to {}", self.auth.email());
        let url = format!("{}/rest/api/3/project", self.base_url);
        let projects: Vec<ProjectSummary> = self.get(&url, CATALOG_TIMEOUT).await?;
        debug!("Catalog returned {} projects", projects.len());
        Ok(projects)
    }

    /// Run one JQL search page.
    ///
    /// Calls `GET /rest/api/3/search/jql`.
    #[instrument(skip(self, request), fields(jql = %request.jql))]
    pub async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage> {
        let url = search_url(&self.base_url, request);
        let page: SearchPage = self.get(&url, SEARCH_TIMEOUT).await?;
        debug!("Search page returned {} issues", page.issues.len());
        Ok(page)
    }

    /// Perform a GET request with authentication and error handling.
    ///
    /// Retries rate limiting, server errors and transport failures.
    #[instrument(skip(self, timeout), fields(url = %url))]
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<T> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!("Request attempt {}/{}", attempts, self.max_attempts);

            match self.execute_get::<T>(url, timeout).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempts < self.max_attempts => {
                    let delay = Self::calculate_retry_delay(attempts);
                    warn!(
                        "Request failed (attempt {}), retrying in {}ms: {}",
                        attempts, delay, e
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Execute a single GET request.
    async fn execute_get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Check the HTTP status and parse the JSON body.
    async fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);

            Err(error_from_response(status, &url, &error_body))
        }
    }

    /// Calculate retry delay with exponential backoff.
    fn calculate_retry_delay(attempt: u32) -> u64 {
        RETRY_DELAY_MS * 2u64.pow(attempt.saturating_sub(1))
    }
}

#[async_trait]
impl ProjectSearch for JiraClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        self.search_page(request).await
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    type Session = JiraClient;

    async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.get_projects().await
    }

    fn open_session(&self) -> Result<Self::Session> {
        Ok(Self {
            client: Self::build_http_client()?,
            base_url: self.base_url.clone(),
            auth: self.auth.clone(),
            max_attempts: self.max_attempts,
        })
    }
}

/// Build the search URL for one page.
fn search_url(base_url: &str, request: &SearchRequest) -> String {
    let mut url = format!(
        "{}/rest/api/3/search/jql?jql={}&maxResults={}&fields={}",
        base_url,
        urlencoding::encode(&request.jql),
        request.max_results.min(100), // JIRA limits to 100
        urlencoding::encode(&request.fields.join(","))
    );
    if request.strict {
        url.push_str("&validateQuery=strict");
    }
    url
}

/// Create an appropriate error from a non-success HTTP response.
///
/// JIRA reports problems as `{"errorMessages": [...], "errors": {...}}`;
/// whichever is populated becomes the error context.
fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(messages) = json.get("errorMessages").and_then(|m| m.as_array()) {
            let messages: Vec<&str> = messages.iter().filter_map(|v| v.as_str()).collect();
            if !messages.is_empty() {
                return ApiError::from_status(status, &messages.join(", "));
            }
        }
        if let Some(errors) = json.get("errors").and_then(|e| e.as_object()) {
            let error_strings: Vec<String> =
                errors.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
            if !error_strings.is_empty() {
                return ApiError::from_status(status, &error_strings.join(", "));
            }
        }
    }

    ApiError::from_status(status, url)
}
