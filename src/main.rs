//! jira-sweep command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use jira_sweep::api::JiraClient;
use jira_sweep::cli::Cli;
use jira_sweep::config::{Config, FileConfig};
use jira_sweep::error::{AppError, Result};
use jira_sweep::extract::{RunSummary, Sweep, SweepOutcome};
use jira_sweep::logging;
use jira_sweep::report::XlsxReport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_options()) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            report_error(&err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = FileConfig::load(cli.config.as_deref())?;
    let config = Config::load(file, cli.overrides())?;

    let client = JiraClient::new(&config)?;
    let mut sink = XlsxReport::new(config.output.clone());

    println!("=======================================================");
    println!("   STRATEGY: AUTOMATIC DISCOVERY + PROJECT SWEEP");
    println!("=======================================================");
    println!("Output: {}", sink.path().display());

    match Sweep::new(config).run(&client, &mut sink).await {
        SweepOutcome::NoProjects => {
            println!("WARNING: No accessible projects found. Check permissions or connection.");
        }
        SweepOutcome::NoData(summary) => {
            print_summary(&summary);
            println!("WARNING: No data was retrieved.");
            print_elapsed(&summary);
        }
        SweepOutcome::Reported {
            summary,
            rows,
            location,
        } => {
            print_summary(&summary);
            println!("SUCCESS: {} rows saved to: {}", rows, location.display());
            print_elapsed(&summary);
        }
        SweepOutcome::SinkFailed { summary, error } => {
            print_summary(&summary);
            report_error(&AppError::from(error));
            print_elapsed(&summary);
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("-------------------------------------------------------");
    for project in &summary.projects {
        println!("  {:<12} {}", project.key, project.describe());
    }
    println!(
        "GLOBAL SUMMARY: {} total records retrieved from {} projects.",
        summary.total_records,
        summary.projects.len()
    );
    println!(
        "  {} of {} projects contributed data.",
        summary.projects_with_data(),
        summary.projects.len()
    );
    if summary.duplicates_dropped > 0 {
        println!(
            "  {} issues seen under more than one project were counted once.",
            summary.duplicates_dropped
        );
    }
}

fn print_elapsed(summary: &RunSummary) {
    println!("Total time: {:.2} seconds.", summary.elapsed.as_secs_f64());
}

fn report_error(err: &AppError) {
    eprintln!("ERROR: {}", err.user_message());
    if let Some(action) = err.suggested_action() {
        eprintln!("{}", action);
    }
}
