use tracing::debug;

use crate::models::{DeletionOutcome, Repository, Tag, Tally};
use crate::output::print_outcome;
use crate::registry::RegistryApi;

/// Delete (or, in dry-run mode, only announce) every planned tag in order.
///
/// A failed delete is reported and counted; the remaining tags are still
/// processed and nothing is retried.
pub async fn execute(
    api: &dyn RegistryApi,
    repo: &Repository,
    to_delete: &[Tag],
    dry_run: bool,
) -> (Vec<(Tag, DeletionOutcome)>, Tally) {
    let mut outcomes = Vec::with_capacity(to_delete.len());
    let mut tally = Tally::default();

    for tag in to_delete {
        let outcome = if dry_run {
            DeletionOutcome::DryRun
        } else {
            match api.delete_tag(repo, &tag.name).await {
                Ok(()) => {
                    debug!(tag = %tag.path, "Deleted tag");
                    DeletionOutcome::Deleted
                }
                Err(e) => {
                    debug!(tag = %tag.path, "Delete failed: {:#}", e);
                    DeletionOutcome::Failed(format!("{:#}", e))
                }
            }
        };

        print_outcome(tag, &outcome);
        tally.record(&outcome);
        outcomes.push((tag.clone(), outcome));
    }

    (outcomes, tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeRegistry;
    use chrono::{Duration, Utc};

    fn setup() -> (FakeRegistry, Repository, Vec<Tag>) {
        let now = Utc::now();
        let mut fake = FakeRegistry::new();
        fake.add_repository(
            1,
            "group/app",
            &[
                ("one", now - Duration::days(1)),
                ("two", now - Duration::days(2)),
                ("three", now - Duration::days(3)),
            ],
        );
        let repo = fake.repositories[0].clone();
        let tags = ["one", "two", "three"]
            .iter()
            .map(|n| Tag {
                name: n.to_string(),
                path: format!("group/app:{}", n),
                created_at: None,
            })
            .collect();
        (fake, repo, tags)
    }

    #[tokio::test]
    async fn test_deletes_in_order() {
        let (fake, repo, tags) = setup();
        let (outcomes, tally) = execute(&fake, &repo, &tags, false).await;
        assert_eq!(fake.deleted(), vec!["one", "two", "three"]);
        assert!(outcomes.iter().all(|(_, o)| *o == DeletionOutcome::Deleted));
        assert_eq!(tally, Tally { attempted: 3, succeeded: 3 });
    }

    #[tokio::test]
    async fn test_failure_does_not_abort() {
        let (mut fake, repo, tags) = setup();
        fake.fail_delete.insert("two".to_string());
        let (outcomes, tally) = execute(&fake, &repo, &tags, false).await;

        assert_eq!(fake.delete_calls(), vec!["one", "two", "three"]);
        assert_eq!(fake.deleted(), vec!["one", "three"]);
        assert_eq!(outcomes[1].0.name, "two");
        assert!(matches!(outcomes[1].1, DeletionOutcome::Failed(_)));
        assert_eq!(tally, Tally { attempted: 3, succeeded: 2 });
    }

    #[tokio::test]
    async fn test_dry_run_never_calls_delete() {
        let (fake, repo, tags) = setup();
        let (outcomes, tally) = execute(&fake, &repo, &tags, true).await;
        assert!(fake.delete_calls().is_empty());
        let announced: Vec<&Tag> = outcomes
            .iter()
            .map(|(tag, outcome)| {
                assert_eq!(*outcome, DeletionOutcome::DryRun);
                tag
            })
            .collect();
        assert_eq!(announced, tags.iter().collect::<Vec<_>>());
        assert_eq!(tally.attempted, 3);
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let (fake, repo, _) = setup();
        let (outcomes, tally) = execute(&fake, &repo, &[], false).await;
        assert!(outcomes.is_empty());
        assert_eq!(tally, Tally::default());
    }
}
