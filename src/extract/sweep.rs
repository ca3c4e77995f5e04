//! The full extraction run.
//!
//! Catalog, then each project in catalog order, then normalization and the
//! report sink. Failures stay inside the project that caused them; the run
//! always visits every project before deciding whether there is anything to
//! report.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::api::{Issue, IssueId, IssueSource};
use crate::config::Config;
use crate::report::{normalize, NormalizedRow, ReportError, ReportSink};

use super::catalog;
use super::paginator::{harvest_project, PaginationOptions, ProjectHarvest, Termination};

/// Per-project line of the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectResult {
    pub key: String,
    /// Issues kept after de-duplication.
    pub records: usize,
    /// Issues fetched here but already collected under an earlier project.
    pub duplicates: usize,
    pub termination: Termination,
    pub requests: usize,
}

impl ProjectResult {
    /// One-line outcome for progress output and the final summary.
    pub fn describe(&self) -> String {
        match (self.records, self.duplicates) {
            (0, 0) => "(Empty or Access Denied)".to_string(),
            (0, dup) => format!("(only {} issues already collected elsewhere)", dup),
            (n, 0) => format!("{} records retrieved", n),
            (n, dup) => format!("{} records retrieved ({} already collected elsewhere)", n, dup),
        }
    }
}

/// What the run did, project by project.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub projects: Vec<ProjectResult>,
    pub total_records: usize,
    /// Issues already collected under an earlier project.
    pub duplicates_dropped: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Projects that contributed at least one record.
    pub fn projects_with_data(&self) -> usize {
        self.projects.iter().filter(|p| p.records > 0).count()
    }
}

/// Terminal state of a run.
#[derive(Debug)]
pub enum SweepOutcome {
    /// The catalog was empty or could not be fetched.
    NoProjects,
    /// Every project came back empty or denied.
    NoData(RunSummary),
    /// Rows were handed to the sink successfully.
    Reported {
        summary: RunSummary,
        rows: usize,
        location: PathBuf,
    },
    /// Extraction succeeded but the sink refused the rows.
    SinkFailed {
        summary: RunSummary,
        error: ReportError,
    },
}

/// Issues gathered across projects, before normalization.
#[derive(Debug, Default)]
pub struct Extraction {
    pub issues: Vec<Issue>,
    pub summary: RunSummary,
}

/// Orchestrates one sweep with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Sweep {
    config: Config,
    options: PaginationOptions,
}

impl Sweep {
    pub fn new(config: Config) -> Self {
        let options = PaginationOptions::from(&config);
        Self { config, options }
    }

    /// Extract, normalize and hand the rows to `sink`.
    #[instrument(skip_all)]
    pub async fn run<S, K>(&self, source: &S, sink: &mut K) -> SweepOutcome
    where
        S: IssueSource,
        K: ReportSink + ?Sized,
    {
        let Some(extraction) = self.extract(source).await else {
            warn!("No accessible projects found. Check permissions or connection.");
            return SweepOutcome::NoProjects;
        };

        let Extraction { issues, summary } = extraction;
        if issues.is_empty() {
            warn!("No data was retrieved");
            return SweepOutcome::NoData(summary);
        }

        info!(
            "GLOBAL SUMMARY: {} total records retrieved from {} projects.",
            summary.total_records,
            summary.projects.len()
        );

        let rows: Vec<NormalizedRow> = issues
            .iter()
            .map(|issue| normalize(issue, &self.config.base_url))
            .collect();

        match sink.write(&rows) {
            Ok(location) => {
                info!(location = %location.display(), "Report saved");
                SweepOutcome::Reported {
                    summary,
                    rows: rows.len(),
                    location,
                }
            }
            Err(error) => SweepOutcome::SinkFailed { summary, error },
        }
    }

    /// Walk the catalog and collect issues from every project.
    ///
    /// Returns `None` when there are no projects to visit.
    pub async fn extract<S: IssueSource>(&self, source: &S) -> Option<Extraction> {
        let started = Instant::now();

        let catalog = catalog::fetch_project_keys(source).await;
        let (projects, unknown) = catalog::restrict(catalog, &self.config.projects);
        for key in &unknown {
            warn!("Requested project {} is not in the catalog, ignoring", key);
        }
        if projects.is_empty() {
            return None;
        }

        let mut extraction = Extraction::default();
        let mut seen: HashSet<IssueId> = HashSet::new();
        let total = projects.len();

        for (index, key) in projects.iter().enumerate() {
            info!("[{}/{}] Processing {}...", index + 1, total, key);

            let harvest = self.harvest(source, key).await;
            let requests = harvest.requests;
            let termination = harvest.termination;

            let before = extraction.issues.len();
            let mut duplicates = 0;
            for issue in harvest.issues {
                if seen.insert(issue.id) {
                    extraction.issues.push(issue);
                } else {
                    debug!(issue = %issue, "Dropping issue already collected from another project");
                    duplicates += 1;
                }
            }

            let result = ProjectResult {
                key: key.clone(),
                records: extraction.issues.len() - before,
                duplicates,
                termination,
                requests,
            };
            info!("{}: {}", key, result.describe());
            debug!(project = %key, reason = result.termination.label(), requests, "Project finished");

            extraction.summary.duplicates_dropped += duplicates;
            extraction.summary.projects.push(result);
        }

        extraction.summary.total_records = extraction.issues.len();
        extraction.summary.elapsed = started.elapsed();
        Some(extraction)
    }

    /// Paginate one project on its own session.
    async fn harvest<S: IssueSource>(&self, source: &S, key: &str) -> ProjectHarvest {
        match source.open_session() {
            Ok(session) => harvest_project(&session, key, &self.options).await,
            Err(e) => {
                warn!("Could not open a session for {}: {}", key, e);
                ProjectHarvest {
                    project: key.to_string(),
                    issues: Vec::new(),
                    termination: Termination::Failed(e.to_string()),
                    requests: 0,
                }
            }
        }
    }
}
