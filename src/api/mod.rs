//! JIRA API client and types.
//!
//! This module provides the interface for reading the JIRA REST API.

mod auth;
mod client;
pub mod error;
pub mod source;
pub mod types;

pub use auth::Auth;
pub use client::{JiraClient, CATALOG_TIMEOUT, SEARCH_TIMEOUT};
pub use error::ApiError;
pub use source::{IssueSource, ProjectSearch, SearchRequest, ISSUE_FIELDS};
pub use types::{Issue, IssueId, ProjectSummary, SearchPage};
