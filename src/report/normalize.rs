//! Flatten raw issues into report rows.
//!
//! Every column is derived on its own with an explicit default, so a missing
//! or malformed field only ever affects its own cell.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::fallback::Fallback;
use super::row::{NormalizedRow, NOT_AVAILABLE};
use crate::api::types::{NamedRef, UserRef};
use crate::api::Issue;

/// Map one issue to its report row. Never fails.
pub fn normalize(issue: &Issue, base_url: &str) -> NormalizedRow {
    let fields = &issue.fields;
    let key = Fallback::first(issue.key.as_deref()).otherwise(NOT_AVAILABLE);

    let issuetype = fields.issuetype.as_ref();
    let (reporter_name, reporter_account_id) = person(fields.reporter.as_ref(), "Unknown");
    let (assignee_name, assignee_account_id) = person(fields.assignee.as_ref(), "Unassigned");

    NormalizedRow {
        project_key: Fallback::first(fields.project.as_ref().and_then(|p| p.key.as_deref()))
            .otherwise(NOT_AVAILABLE),
        issue_type: Fallback::first(issuetype.and_then(|t| t.name.as_deref()))
            .or(issuetype.and_then(|t| t.id.as_deref()))
            .otherwise("N/A (Corrupt)"),
        summary: Fallback::first(fields.summary.as_deref()).otherwise("No Summary"),
        created: fields.created.as_deref().and_then(parse_created),
        updated: Fallback::first(fields.updated.as_deref().map(date_portion))
            .otherwise(NOT_AVAILABLE),
        reporter_name,
        reporter_account_id,
        assignee_name,
        assignee_account_id,
        status: name_or(fields.status.as_ref(), NOT_AVAILABLE),
        priority: name_or(fields.priority.as_ref(), "Normal"),
        resolution: name_or(fields.resolution.as_ref(), "Unresolved"),
        components: join_names(&fields.components),
        labels: join(fields.labels.iter().map(String::as_str)),
        fix_versions: join_names(&fields.fix_versions),
        linked_issues: join(linked_keys(issue)),
        original_estimate_secs: fields.timeoriginalestimate.unwrap_or(0),
        link: format!("{}/browse/{}", base_url, key),
        key,
    }
}

/// Display name (falling back to the account id, then `nobody`) and account id.
fn person(user: Option<&UserRef>, nobody: &str) -> (String, String) {
    let account_id = user.and_then(|u| u.account_id.as_deref());
    let name = Fallback::first(user.and_then(|u| u.display_name.as_deref()))
        .or(account_id)
        .otherwise(nobody);
    (name, Fallback::first(account_id).otherwise(NOT_AVAILABLE))
}

fn name_or(named: Option<&NamedRef>, default: &str) -> String {
    Fallback::first(named.and_then(|n| n.name.as_deref())).otherwise(default)
}

fn join_names(items: &[NamedRef]) -> String {
    join(items.iter().filter_map(|item| item.name.as_deref()))
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values
        .filter(|v| !v.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Keys of outward links first, then inward links.
fn linked_keys(issue: &Issue) -> impl Iterator<Item = &str> {
    let links = &issue.fields.issuelinks;
    let outward = links
        .iter()
        .filter_map(|l| l.outward_issue.as_ref()?.key.as_deref());
    let inward = links
        .iter()
        .filter_map(|l| l.inward_issue.as_ref()?.key.as_deref());
    outward.chain(inward)
}

/// The part of a timestamp before `T`.
fn date_portion(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Parse a JIRA creation timestamp such as `2025-11-22T22:16:22.000-0300`.
///
/// Everything from the first `.` is dropped, so the fractional seconds and the
/// offset that follows them are ignored and the wall-clock date is kept.
/// Inputs without fractional seconds may still carry an offset.
pub fn parse_created(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().split('.').next()?;

    NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(head, "%Y-%m-%d %H:%M:%S"))
        .map(|dt| dt.date())
        .or_else(|_| DateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S%z").map(|dt| dt.date_naive()))
        .or_else(|_| DateTime::parse_from_rfc3339(head).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(head, "%Y-%m-%d"))
        .ok()
}
