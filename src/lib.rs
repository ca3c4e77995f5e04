//! jira-sweep - bulk issue extraction from JIRA
//!
//! Discovers every project visible to the caller, walks each one with keyset
//! pagination and writes the flattened issues to a spreadsheet.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod report;

#[cfg(test)]
mod testing;
