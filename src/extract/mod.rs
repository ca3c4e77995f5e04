//! Issue extraction: catalog discovery, keyset pagination and the sweep that
//! ties them together.

pub mod catalog;
mod jql;
pub mod paginator;
mod sweep;

pub use jql::ProjectFilter;
pub use paginator::{harvest_project, PaginationOptions, ProjectHarvest, Termination};
pub use sweep::{Extraction, ProjectResult, RunSummary, Sweep, SweepOutcome};
