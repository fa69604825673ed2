use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::executor::execute;
use crate::filter::{select_repositories, select_tags};
use crate::models::{DeletionOutcome, Repository, Tag, Tally};
use crate::output::{print_plan, print_searching, print_skip, print_tally};
use crate::registry::RegistryApi;
use crate::resolve::resolve_timestamps;

/// Result of processing one repository to completion
#[derive(Debug)]
pub struct RepoReport {
    pub path: String,
    pub matched: usize,
    pub kept: usize,
    pub outcomes: Vec<(Tag, DeletionOutcome)>,
    pub tally: Tally,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ListFailed(String),
    BelowFloor { matched: usize, keep_n: usize },
    ResolveFailed(String),
}

#[derive(Debug, Default)]
pub struct SweepReport {
    pub repositories: Vec<RepoReport>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Run the whole sweep: select repositories, then plan and execute each in turn.
///
/// Only a catalog listing failure or an empty repository selection is fatal;
/// every other failure is confined to its repository or tag.
pub async fn run(api: Arc<dyn RegistryApi>, config: &Config) -> Result<SweepReport> {
    let repos = api.list_repositories().await?;
    debug!("Found {} registry repositories", repos.len());

    let matched = select_repositories(repos, &config.rules);
    if matched.is_empty() {
        return Err(AppError::NoRepositoryMatched.into());
    }

    let mut report = SweepReport::default();
    for repo in &matched {
        match sweep_repository(&api, repo, config).await {
            Ok(repo_report) => report.repositories.push(repo_report),
            Err(reason) => report.skipped.push((repo.path.clone(), reason)),
        }
    }

    Ok(report)
}

/// Plan and execute one repository. A `SkipReason` means no tally was produced.
pub async fn sweep_repository(
    api: &Arc<dyn RegistryApi>,
    repo: &Repository,
    config: &Config,
) -> Result<RepoReport, SkipReason> {
    print_searching(&repo.path);

    let tags = match api.list_tags(repo).await {
        Ok(tags) => tags,
        Err(e) => {
            error!("Skipping {}: {:#}", repo.path, e);
            let reason = SkipReason::ListFailed(format!("{:#}", e));
            print_skip(&reason);
            return Err(reason);
        }
    };

    let matched = select_tags(tags, &config.rules);
    let matched_count = matched.len();
    debug!("Found {} matched tags in {}", matched_count, repo.path);

    // Checked against the count before any detail is fetched; tags whose
    // detail later fails only shrink what the planner sees.
    let policy = &config.policy;
    if !policy.exceeds_floor(matched_count) {
        let reason = SkipReason::BelowFloor {
            matched: matched_count,
            keep_n: policy.keep_n,
        };
        print_skip(&reason);
        return Err(reason);
    }

    let resolved = match resolve_timestamps(api, repo, matched, config.jobs).await {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("Resolving tags of {} failed: {:#}", repo.path, e);
            let reason = SkipReason::ResolveFailed(format!("{:#}", e));
            print_skip(&reason);
            return Err(reason);
        }
    };

    let plan = policy.plan(resolved, Utc::now());
    info!(
        "{} tags in {} will be deleted",
        plan.to_delete.len(),
        repo.path
    );
    print_plan(&plan, config.dry_run);

    let (outcomes, tally) = execute(api.as_ref(), repo, &plan.to_delete, config.dry_run).await;
    print_tally(&repo.path, &tally, config.dry_run);

    Ok(RepoReport {
        path: repo.path.clone(),
        matched: matched_count,
        kept: plan.to_keep.len(),
        outcomes,
        tally,
    })
}
