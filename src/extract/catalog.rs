//! Project catalog discovery.

use tracing::{error, info, instrument};

use crate::api::IssueSource;

/// List the keys of every project visible to the caller, in server order.
///
/// Any failure is logged and yields an empty list: an unreachable catalog
/// means there is nothing to sweep, not that the run crashed.
#[instrument(skip(source))]
pub async fn fetch_project_keys<S: IssueSource>(source: &S) -> Vec<String> {
    info!("Querying JIRA project catalog");

    match source.list_projects().await {
        Ok(projects) => {
            let keys: Vec<String> = projects.into_iter().map(|p| p.key).collect();
            let preview: Vec<&str> = keys.iter().take(5).map(String::as_str).collect();
            info!(
                count = keys.len(),
                "Found {} accessible projects (e.g. {})",
                keys.len(),
                preview.join(", ")
            );
            keys
        }
        Err(e) => {
            error!("Failed to list projects: {}", e);
            Vec::new()
        }
    }
}

/// Narrow the catalog to the requested keys, keeping catalog order.
///
/// An empty request keeps everything. Requested keys that the catalog does
/// not contain are returned separately so the caller can report them.
pub fn restrict(catalog: Vec<String>, requested: &[String]) -> (Vec<String>, Vec<String>) {
    if requested.is_empty() {
        return (catalog, Vec::new());
    }

    let missing = requested
        .iter()
        .filter(|r| !catalog.iter().any(|k| k.eq_ignore_ascii_case(r)))
        .cloned()
        .collect();

    let kept = catalog
        .into_iter()
        .filter(|k| requested.iter().any(|r| r.eq_ignore_ascii_case(k)))
        .collect();

    (kept, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSource;

    #[tokio::test]
    async fn test_fetch_returns_keys_in_order() {
        let source = MockSource::new().with_project("UPMU", vec![]).with_project("SDI", vec![]);
        assert_eq!(fetch_project_keys(&source).await, vec!["UPMU", "SDI"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty() {
        let source = MockSource::new().with_project("UPMU", vec![]).with_catalog_failure();
        assert!(fetch_project_keys(&source).await.is_empty());
    }

    #[test]
    fn test_restrict_empty_request_keeps_all() {
        let (kept, missing) = restrict(vec!["A".into(), "B".into()], &[]);
        assert_eq!(kept, vec!["A", "B"]);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_restrict_keeps_catalog_order_and_reports_missing() {
        let catalog = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let requested = vec!["c".to_string(), "A".to_string(), "ZZ".to_string()];

        let (kept, missing) = restrict(catalog, &requested);
        assert_eq!(kept, vec!["A", "C"]);
        assert_eq!(missing, vec!["ZZ"]);
    }
}
