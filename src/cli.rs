//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;
use crate::logging::LogOptions;

/// Export every accessible JIRA test-management issue and bug to one spreadsheet.
///
/// Credentials are read from JIRA_EMAIL and JIRA_API_TOKEN; the instance from
/// JIRA_BASE_URL, the config file or --base-url.
#[derive(Debug, Parser)]
#[command(name = "jira-sweep", version, about)]
pub struct Cli {
    /// JIRA instance URL, e.g. https://company.atlassian.net
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Spreadsheet to write [default: consolidated_report.xlsx]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only sweep these project keys (comma separated)
    #[arg(short, long, value_delimiter = ',', value_name = "KEYS")]
    pub projects: Option<Vec<String>>,

    /// Configuration file [default: <config dir>/jira-sweep/config.toml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not write the rotating log file
    #[arg(long)]
    pub no_log_file: bool,
}

impl Cli {
    /// Values that override the config file and environment.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            output: self.output.clone(),
            projects: self.projects.clone(),
        }
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            verbose: self.verbose,
            to_file: !self.no_log_file,
        }
    }
}
