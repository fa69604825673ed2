use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::models::{Repository, Tag};
use crate::registry::RegistryApi;

/// Attach creation timestamps to `tags`, at most `jobs` detail requests in flight.
///
/// The result keeps the listing order. Tags whose detail cannot be fetched are
/// logged and dropped; the rest of the repository is unaffected.
pub async fn resolve_timestamps(
    api: &Arc<dyn RegistryApi>,
    repo: &Repository,
    tags: Vec<Tag>,
    jobs: usize,
) -> Result<Vec<Tag>> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut handles = Vec::with_capacity(tags.len());

    for tag in tags {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .context("Worker pool closed")?;
        let api = Arc::clone(api);
        let repo = repo.clone();

        handles.push(tokio::spawn(async move {
            let result = api.tag_created_at(&repo, &tag.name).await;
            drop(permit);
            (tag, result)
        }));
    }

    let mut resolved = Vec::with_capacity(handles.len());
    for handle in handles {
        let (mut tag, result) = handle.await.context("Task join error")?;
        match result {
            Ok(created) => {
                debug!(tag = %tag.name, %created, "Resolved tag creation time");
                tag.created_at = Some(created);
                resolved.push(tag);
            }
            Err(e) => {
                error!(
                    "Get registry repository tag detail failed, path: {}, error: {:#}",
                    tag.path, e
                );
            }
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeRegistry;
    use chrono::{Duration, Utc};

    fn registry() -> FakeRegistry {
        let now = Utc::now();
        let mut fake = FakeRegistry::new();
        fake.add_repository(
            1,
            "group/app",
            &[
                ("a", now - Duration::days(3)),
                ("b", now - Duration::days(1)),
                ("c", now - Duration::days(2)),
                ("d", now - Duration::days(9)),
            ],
        );
        fake
    }

    async fn listed(api: &Arc<dyn RegistryApi>) -> (Repository, Vec<Tag>) {
        let repo = api.list_repositories().await.unwrap().remove(0);
        let tags = api.list_tags(&repo).await.unwrap();
        (repo, tags)
    }

    #[tokio::test]
    async fn test_resolves_in_listing_order() {
        for jobs in [0, 1, 3, 16] {
            let api: Arc<dyn RegistryApi> = Arc::new(registry());
            let (repo, tags) = listed(&api).await;
            let resolved = resolve_timestamps(&api, &repo, tags, jobs).await.unwrap();
            let names: Vec<&str> = resolved.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(names, vec!["a", "b", "c", "d"]);
            assert!(resolved.iter().all(|t| t.created_at.is_some()));
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_drops_only_that_tag() {
        let mut fake = registry();
        fake.fail_fetch.insert("c".to_string());
        let fake = Arc::new(fake);
        let api: Arc<dyn RegistryApi> = fake.clone();
        let (repo, tags) = listed(&api).await;

        let resolved = resolve_timestamps(&api, &repo, tags, 2).await.unwrap();
        let names: Vec<&str> = resolved.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "d"]);
        assert_eq!(fake.fetched().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let api: Arc<dyn RegistryApi> = Arc::new(registry());
        let (repo, _) = listed(&api).await;
        let resolved = resolve_timestamps(&api, &repo, Vec::new(), 4).await.unwrap();
        assert!(resolved.is_empty());
    }
}
