//! The flat report row.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Placeholder for values that could not be derived.
pub const NOT_AVAILABLE: &str = "N/A";

/// Report column headers, in output order.
pub const COLUMNS: [&str; 21] = [
    "Project Key",
    "Key",
    "Issue Type",
    "Summary",
    "Creation Date",
    "Creation Month",
    "Creation Year",
    "Updated",
    "Reporter Name",
    "Reporter AccountID",
    "Assignee Name",
    "Assignee AccountID",
    "Status",
    "Priority",
    "Resolution",
    "Components",
    "Labels",
    "Fix Versions",
    "Linked Issues (Keys)",
    "Original Estimate (s)",
    "Link",
];

/// A single report cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(i64),
}

impl Cell {
    fn text(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One issue flattened for reporting, every field already defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub project_key: String,
    pub key: String,
    pub issue_type: String,
    pub summary: String,
    /// Creation day; `None` when the timestamp was missing or unparsable.
    pub created: Option<NaiveDate>,
    pub updated: String,
    pub reporter_name: String,
    pub reporter_account_id: String,
    pub assignee_name: String,
    pub assignee_account_id: String,
    pub status: String,
    pub priority: String,
    pub resolution: String,
    pub components: String,
    pub labels: String,
    pub fix_versions: String,
    pub linked_issues: String,
    pub original_estimate_secs: i64,
    pub link: String,
}

impl NormalizedRow {
    /// `YYYY-MM-DD`, or "N/A".
    pub fn creation_date(&self) -> Cell {
        match self.created {
            Some(date) => Cell::Text(date.format("%Y-%m-%d").to_string()),
            None => Cell::text(NOT_AVAILABLE),
        }
    }

    /// Numeric month, or "N/A".
    pub fn creation_month(&self) -> Cell {
        match self.created {
            Some(date) => Cell::Number(i64::from(date.month())),
            None => Cell::text(NOT_AVAILABLE),
        }
    }

    /// Numeric year, or "N/A".
    pub fn creation_year(&self) -> Cell {
        match self.created {
            Some(date) => Cell::Number(i64::from(date.year())),
            None => Cell::text(NOT_AVAILABLE),
        }
    }

    /// The row's cells, aligned with [`COLUMNS`].
    pub fn cells(&self) -> [Cell; 21] {
        [
            Cell::text(&self.project_key),
            Cell::text(&self.key),
            Cell::text(&self.issue_type),
            Cell::text(&self.summary),
            self.creation_date(),
            self.creation_month(),
            self.creation_year(),
            Cell::text(&self.updated),
            Cell::text(&self.reporter_name),
            Cell::text(&self.reporter_account_id),
            Cell::text(&self.assignee_name),
            Cell::text(&self.assignee_account_id),
            Cell::text(&self.status),
            Cell::text(&self.priority),
            Cell::text(&self.resolution),
            Cell::text(&self.components),
            Cell::text(&self.labels),
            Cell::text(&self.fix_versions),
            Cell::text(&self.linked_issues),
            Cell::Number(self.original_estimate_secs),
            Cell::text(&self.link),
        ]
    }
}
