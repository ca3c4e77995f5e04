//! In-memory JIRA stand-in for tests.
//!
//! `MockSource` holds a catalog and the issue ids of each project and answers
//! searches by evaluating the `project = "KEY"` and `id < N` clauses of the
//! JQL it receives, the way the server would. Faults can be scheduled on a
//! given page of a given project.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::error::Result;
use crate::api::types::{IssueFields, NamedRef, ProjectRef};
use crate::api::{
    ApiError, Issue, IssueId, IssueSource, ProjectSearch, ProjectSummary, SearchPage,
    SearchRequest,
};

/// `count` ids counting down from `start`.
pub fn descending_ids(start: u64, count: u64) -> Vec<u64> {
    (0..count).map(|i| start - i).collect()
}

/// Failure injected in place of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Unauthorized,
    Forbidden,
    ServerError,
    /// HTTP 400, e.g. a query the server refuses to validate.
    BadRequest,
    Malformed,
    /// Serve the page as raw JSON with the middle issue's `project` field
    /// replaced by a bare string, then decode it like the client would.
    OddField,
    /// Serve the first page again regardless of the cursor.
    IgnoreCursor,
}

#[derive(Debug, Default)]
struct MockState {
    catalog: Vec<String>,
    issues: HashMap<String, Vec<u64>>,
    faults: HashMap<(String, usize), Fault>,
    catalog_fails: bool,
    requests: Vec<(String, SearchRequest)>,
    sessions_opened: usize,
}

/// Scripted issue source; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    state: Arc<Mutex<MockState>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project with the given issue ids (any order).
    pub fn with_project(self, key: &str, mut ids: Vec<u64>) -> Self {
        ids.sort_unstable_by(|a, b| b.cmp(a));
        {
            let mut state = self.state.lock().unwrap();
            state.catalog.push(key.to_string());
            state.issues.insert(key.to_string(), ids);
        }
        self
    }

    /// Fail the `page`-th request (1-based) for `key`.
    pub fn with_fault(self, key: &str, page: usize, fault: Fault) -> Self {
        self.state
            .lock()
            .unwrap()
            .faults
            .insert((key.to_string(), page), fault);
        self
    }

    pub fn with_catalog_failure(self) -> Self {
        self.state.lock().unwrap().catalog_fails = true;
        self
    }

    /// Requests received for one project, in order.
    pub fn requests_for(&self, key: &str) -> Vec<SearchRequest> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Total search requests received.
    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn sessions_opened(&self) -> usize {
        self.state.lock().unwrap().sessions_opened
    }

    /// Build issues the way the server would return them for `key`.
    pub fn issues(key: &str, ids: &[u64]) -> Vec<Issue> {
        ids.iter().map(|&id| make_issue(key, id)).collect()
    }
}

fn make_issue(key: &str, id: u64) -> Issue {
    Issue {
        id: IssueId(id),
        key: Some(format!("{}-{}", key, id)),
        fields: IssueFields {
            project: Some(ProjectRef {
                key: Some(key.to_string()),
                name: None,
            }),
            issuetype: Some(NamedRef {
                id: Some("10100".to_string()),
                name: Some("Test".to_string()),
            }),
            summary: Some(format!("Issue {}", id)),
            created: Some("2025-11-22T22:16:22.000-0300".to_string()),
            ..IssueFields::default()
        },
    }
}

/// `project = "KEY"` -> `KEY`
fn project_of(jql: &str) -> String {
    jql.split_once("project = \"")
        .and_then(|(_, rest)| rest.split_once('"'))
        .map(|(key, _)| key.to_string())
        .unwrap_or_default()
}

/// `... id < 123 ...` -> `123`
fn cursor_of(jql: &str) -> Option<u64> {
    jql.split_once("id < ")
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
}

fn below_cursor(ids: Vec<u64>, jql: &str, limit: usize) -> Vec<u64> {
    ids.into_iter()
        .filter(|id| cursor_of(jql).map_or(true, |c| *id < c))
        .take(limit)
        .collect()
}

fn decode_with_odd_field(key: &str, ids: &[u64]) -> Result<SearchPage> {
    let mut body = serde_json::json!({ "issues": MockSource::issues(key, ids) });
    if let Some(issues) = body["issues"].as_array_mut() {
        let middle = issues.len() / 2;
        if let Some(issue) = issues.get_mut(middle) {
            issue["fields"]["project"] = serde_json::Value::String(key.to_string());
        }
    }
    serde_json::from_value(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl ProjectSearch for MockSource {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        let mut state = self.state.lock().unwrap();
        let key = project_of(&request.jql);
        state.requests.push((key.clone(), request.clone()));
        let page_number = state.requests.iter().filter(|(k, _)| *k == key).count();

        let ids = state.issues.get(&key).cloned().unwrap_or_default();
        let limit = request.max_results as usize;

        let selected: Vec<u64> = match state.faults.get(&(key.clone(), page_number)) {
            Some(Fault::Unauthorized) => return Err(ApiError::Unauthorized),
            Some(Fault::Forbidden) => return Err(ApiError::Forbidden),
            Some(Fault::ServerError) => {
                return Err(ApiError::from_status(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "mock",
                ))
            }
            Some(Fault::BadRequest) => {
                return Err(ApiError::from_status(StatusCode::BAD_REQUEST, "mock"))
            }
            Some(Fault::Malformed) => {
                return Err(ApiError::InvalidResponse("expected value at line 1".into()))
            }
            Some(Fault::IgnoreCursor) => ids.into_iter().take(limit).collect(),
            Some(Fault::OddField) => {
                let selected = below_cursor(ids, &request.jql, limit);
                return decode_with_odd_field(&key, &selected);
            }
            None => below_cursor(ids, &request.jql, limit),
        };

        Ok(SearchPage {
            issues: MockSource::issues(&key, &selected),
        })
    }
}

#[async_trait]
impl IssueSource for MockSource {
    type Session = MockSource;

    async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let state = self.state.lock().unwrap();
        if state.catalog_fails {
            return Err(ApiError::Unauthorized);
        }
        Ok(state
            .catalog
            .iter()
            .map(|key| ProjectSummary {
                key: key.clone(),
                id: None,
                name: None,
            })
            .collect())
    }

    fn open_session(&self) -> Result<Self::Session> {
        self.state.lock().unwrap().sessions_opened += 1;
        Ok(self.clone())
    }
}
