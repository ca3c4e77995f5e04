//! The seam between the extraction logic and the remote tracker.
//!
//! The sweep only ever needs two things from JIRA: the project catalog and
//! one page of search results at a time. `JiraClient` implements both over
//! HTTP; tests substitute in-memory sources.

use async_trait::async_trait;

use super::error::Result;
use super::types::{ProjectSummary, SearchPage};

/// Fields requested for every issue.
pub const ISSUE_FIELDS: &[&str] = &[
    "key",
    "summary",
    "status",
    "created",
    "updated",
    "id",
    "project",
    "issuetype",
    "reporter",
    "assignee",
    "priority",
    "components",
    "labels",
    "resolution",
    "fixVersions",
    "issuelinks",
    "timeoriginalestimate",
];

/// One search call: a JQL expression plus its paging and projection options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// The full JQL, including ordering.
    pub jql: String,
    /// Upper bound on issues returned for this page.
    pub max_results: u32,
    /// Field projection list.
    pub fields: Vec<String>,
    /// Ask the server to reject unknown fields/values instead of ignoring them.
    pub strict: bool,
}

impl SearchRequest {
    /// A strict request projecting `ISSUE_FIELDS`.
    pub fn new(jql: impl Into<String>, max_results: u32) -> Self {
        Self {
            jql: jql.into(),
            max_results,
            fields: ISSUE_FIELDS.iter().map(|f| f.to_string()).collect(),
            strict: true,
        }
    }
}

/// Searches scoped to one authenticated connection.
#[async_trait]
pub trait ProjectSearch: Send + Sync {
    /// Fetch one page of issues.
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage>;
}

/// A remote tracker the sweep can enumerate.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// The connection type handed to each project's pagination.
    type Session: ProjectSearch;

    /// List every project visible to the caller, in server order.
    async fn list_projects(&self) -> Result<Vec<ProjectSummary>>;

    /// Open a fresh connection for one project's pagination loop.
    fn open_session(&self) -> Result<Self::Session>;
}
