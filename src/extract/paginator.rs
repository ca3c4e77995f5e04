//! Keyset pagination over one project.
//!
//! JIRA refuses or misbehaves on deep offset pagination, so each project is
//! walked newest-first by issue id: every page asks for `id < cursor`, where
//! the cursor is the lowest id seen so far. Issues created during the walk get
//! ids above every cursor, so they can neither shift a page boundary nor be
//! returned twice.

use tracing::{debug, error, instrument, warn};

use crate::api::{Issue, IssueId, ProjectSearch, SearchRequest};
use crate::config::Config;

use super::jql::ProjectFilter;

/// Limits and filter applied to every project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOptions {
    /// Issue type whitelist.
    pub issue_types: Vec<String>,
    /// Issues requested per page.
    pub page_size: u32,
    /// Stop once this many issues were collected for a project.
    pub safety_cap: usize,
}

impl From<&Config> for PaginationOptions {
    fn from(config: &Config) -> Self {
        Self {
            issue_types: config.issue_types.clone(),
            page_size: config.page_size,
            safety_cap: config.safety_cap,
        }
    }
}

/// Why a project's pagination stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// A page came back empty.
    Exhausted,
    /// The server answered 401/403; nothing from the project is kept.
    AccessDenied,
    /// A transport or parse error; issues from earlier pages are kept.
    Failed(String),
    /// The safety cap was reached.
    SafetyCap,
    /// A page was not strictly below the cursor, or not in descending order.
    /// The page is dropped and earlier pages are kept.
    CursorViolation,
}

impl Termination {
    /// Short label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Termination::Exhausted => "complete",
            Termination::AccessDenied => "access denied",
            Termination::Failed(_) => "failed",
            Termination::SafetyCap => "safety cap",
            Termination::CursorViolation => "cursor violation",
        }
    }
}

/// Everything one project's pagination produced.
#[derive(Debug, Clone)]
pub struct ProjectHarvest {
    /// The project key.
    pub project: String,
    /// Issues in fetch order, i.e. strictly decreasing id.
    pub issues: Vec<Issue>,
    /// Why the loop ended.
    pub termination: Termination,
    /// Search requests issued.
    pub requests: usize,
}

/// Enumerate every matching issue of `project_key`.
///
/// Never fails: errors end the loop and are reflected in the returned
/// [`Termination`].
#[instrument(skip(session, options), fields(project = %project_key))]
pub async fn harvest_project<S: ProjectSearch + ?Sized>(
    session: &S,
    project_key: &str,
    options: &PaginationOptions,
) -> ProjectHarvest {
    let filter = ProjectFilter::new(project_key, &options.issue_types);
    let mut issues: Vec<Issue> = Vec::new();
    let mut cursor: Option<IssueId> = None;
    let mut requests = 0;

    let termination = loop {
        if issues.len() >= options.safety_cap {
            warn!(
                "Safety limit of {} issues reached for {}, stopping",
                options.safety_cap, project_key
            );
            break Termination::SafetyCap;
        }

        let request = SearchRequest::new(filter.page_query(cursor), options.page_size);
        requests += 1;

        let page = match session.search(&request).await {
            Ok(page) => page,
            Err(e) if e.is_access_denied() => {
                warn!("Access denied to project {}, skipping", project_key);
                issues.clear();
                break Termination::AccessDenied;
            }
            Err(e) => {
                error!("Error in {} after {} issues: {}", project_key, issues.len(), e);
                break Termination::Failed(e.to_string());
            }
        };

        let Some(last) = page.issues.last().map(|issue| issue.id) else {
            break Termination::Exhausted;
        };

        if !is_descending_below(&page.issues, cursor) {
            warn!(
                "Page for {} is not strictly below cursor {:?}, stopping",
                project_key, cursor
            );
            break Termination::CursorViolation;
        }

        debug!(page = requests, size = page.issues.len(), cursor = %last, "Page fetched");
        issues.extend(page.issues);
        cursor = Some(last);
    };

    ProjectHarvest {
        project: project_key.to_string(),
        issues,
        termination,
        requests,
    }
}

/// Ids strictly decrease within the page and all lie below the cursor.
fn is_descending_below(page: &[Issue], cursor: Option<IssueId>) -> bool {
    let below_cursor = match (cursor, page.first()) {
        (Some(cursor), Some(first)) => first.id < cursor,
        _ => true,
    };
    below_cursor && page.windows(2).all(|pair| pair[0].id > pair[1].id)
}
