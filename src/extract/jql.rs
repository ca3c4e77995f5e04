//! JQL construction for keyset pagination.

use crate::api::IssueId;

/// The project/issue-type filter shared by every page of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFilter {
    base: String,
}

impl ProjectFilter {
    /// `project = "KEY" AND issuetype in ("A", "B", ...)`
    pub fn new<S: AsRef<str>>(project_key: &str, issue_types: &[S]) -> Self {
        let types = issue_types
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .map(quote)
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            base: format!("project = {} AND issuetype in ({})", quote(project_key), types),
        }
    }

    /// The query for the page after `cursor`, newest first.
    ///
    /// Without a cursor this is the first page.
    pub fn page_query(&self, cursor: Option<IssueId>) -> String {
        match cursor {
            None => format!("{} ORDER BY id DESC", self.base),
            Some(id) => format!("{} AND id < {} ORDER BY id DESC", self.base, id),
        }
    }
}

/// Quote a JQL string literal.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}
