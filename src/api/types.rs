//! JIRA API response types.
//!
//! These types model the subset of the JIRA REST API v3 responses the sweep
//! reads. Every nested issue field is optional: a missing key, an explicit
//! `null` and a value of the wrong shape all deserialize to the empty value,
//! so one odd issue never fails the page it arrived on. Only the issue `id`
//! is strict, since pagination depends on it.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit JSON `null` like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode any JSON value, falling back to the default on a shape mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a JSON array element by element, skipping elements that do not fit.
/// Anything other than an array yields an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// A project from the catalog.
///
/// Returned as an array by `GET /rest/api/3/project`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSummary {
    /// The project key (e.g., "PROJ").
    pub key: String,
    /// The project ID.
    #[serde(default)]
    pub id: Option<String>,
    /// The project name.
    #[serde(default)]
    pub name: Option<String>,
}

/// One page of search results.
///
/// Returned by `GET /rest/api/3/search/jql`. Only `issues` drives pagination;
/// the token-based continuation fields are ignored in favour of the id cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    /// The issues on this page, in the order the query requested.
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<Issue>,
}

/// The numeric, server-assigned issue identifier.
///
/// JIRA sends it as a string (`"10001"`); numbers are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IssueId(pub u64);

impl<'de> Deserialize<'de> for IssueId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(IssueId(n)),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map(IssueId)
                .map_err(|_| serde::de::Error::custom(format!("invalid issue id '{}'", s))),
        }
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A JIRA issue as fetched by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// The issue ID; the pagination cursor is derived from it.
    pub id: IssueId,
    /// The issue key (e.g., "PROJ-123").
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    /// The projected issue fields.
    #[serde(default, deserialize_with = "lenient")]
    pub fields: IssueFields,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.key.as_deref().unwrap_or("?"), self.id)
    }
}

/// Issue fields requested through the field projection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    /// The project this issue belongs to.
    #[serde(default, deserialize_with = "lenient")]
    pub project: Option<ProjectRef>,
    /// The issue type (Test, Bug, Precondition, ...).
    #[serde(default, deserialize_with = "lenient")]
    pub issuetype: Option<NamedRef>,
    /// The issue summary/title.
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    /// Creation timestamp, e.g. `2025-11-22T22:16:22.000-0300`.
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<String>,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "lenient")]
    pub updated: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reporter: Option<UserRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub assignee: Option<UserRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub resolution: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub components: Vec<NamedRef>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub fix_versions: Vec<NamedRef>,
    /// Links to other issues, in either direction.
    #[serde(default, deserialize_with = "lenient_list")]
    pub issuelinks: Vec<IssueLink>,
    /// Original time estimate in seconds.
    #[serde(default, deserialize_with = "lenient")]
    pub timeoriginalestimate: Option<i64>,
}

/// Reference to the owning project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Any sub-object identified by an id and a display name
/// (issue type, status, priority, resolution, component, version).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A JIRA user as embedded in issue fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

/// A link between two issues. Exactly one side is normally populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
    #[serde(default)]
    pub outward_issue: Option<LinkedIssue>,
    #[serde(default)]
    pub inward_issue: Option<LinkedIssue>,
}

/// The far end of an issue link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkedIssue {
    #[serde(default)]
    pub key: Option<String>,
}
