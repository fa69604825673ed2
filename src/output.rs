use colored::Colorize;

use crate::models::{DeletionOutcome, KeepReason, RetentionPlan, Tag, Tally};
use crate::sweep::{RepoReport, SkipReason, SweepReport};

pub fn print_searching(path: &str) {
    println!("\nSearching in {}", path.bold());
}

pub fn print_skip(reason: &SkipReason) {
    match reason {
        SkipReason::BelowFloor { matched, keep_n } => println!(
            "  {}",
            format!(
                "Skip because of less matched tags ({}) than keep N ({})",
                matched, keep_n
            )
            .dimmed()
        ),
        SkipReason::ListFailed(e) => println!("  {} {}", "ERROR".red().bold(), e),
        SkipReason::ResolveFailed(e) => println!(
            "  {} Resolving tag details failed: {}",
            "ERROR".red().bold(),
            e
        ),
    }
}

/// Print the retention plan for a repository
pub fn print_plan(plan: &RetentionPlan, dry_run: bool) {
    println!("{}", "─".repeat(60));
    if dry_run {
        println!("  {} (no changes will be made)", "DRY RUN".yellow().bold());
    }

    if !plan.to_delete.is_empty() {
        println!("  {} ({}):", "TO DELETE".red().bold(), plan.to_delete.len());
        for tag in &plan.to_delete {
            println!(
                "    [{}] {:<30} {}",
                "DELETE".red().bold(),
                tag.name,
                created_str(tag).dimmed()
            );
        }
    }

    if !plan.to_keep.is_empty() {
        println!("  {} ({}):", "KEEP".green().bold(), plan.to_keep.len());
        for (tag, reason) in &plan.to_keep {
            let why = match reason {
                KeepReason::Newest => "newest".to_string(),
                KeepReason::TooRecent(age) => format!("only {}h old", age.num_hours()),
            };
            println!(
                "    [{}] {:<30} {} {}",
                "  KEEP".green().bold(),
                tag.name,
                created_str(tag).dimmed(),
                format!("({})", why).dimmed()
            );
        }
    }

    if plan.to_delete.is_empty() {
        println!("  {}", "Nothing to delete.".green());
    }
}

fn created_str(tag: &Tag) -> String {
    match &tag.created_at {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "unknown".to_string(),
    }
}

pub fn print_outcome(tag: &Tag, outcome: &DeletionOutcome) {
    match outcome {
        DeletionOutcome::DryRun => {
            println!("  {} {} will be deleted", "[Dry run]".yellow(), tag.path)
        }
        DeletionOutcome::Deleted => println!("  Delete {} {}", tag.path, "OK".green()),
        DeletionOutcome::Failed(e) => {
            println!("  Delete {} {} {}", tag.path, "error:".red().bold(), e)
        }
    }
}

pub fn print_tally(path: &str, tally: &Tally, dry_run: bool) {
    if dry_run {
        println!("  {} tags would be deleted in {}", tally.attempted, path);
    } else {
        let count = format!("{}/{}", tally.succeeded, tally.attempted);
        let count = if tally.failed() > 0 {
            count.red().bold()
        } else {
            count.green().bold()
        };
        println!("  {} tags have been deleted in {}", count, path);
    }
}

/// Print final summary
pub fn print_summary(report: &SweepReport, dry_run: bool) {
    let deleted: usize = report.repositories.iter().map(|r| r.tally.succeeded).sum();
    let failed = report
        .repositories
        .iter()
        .flat_map(|r| &r.outcomes)
        .filter(|(_, o)| matches!(o, DeletionOutcome::Failed(_)))
        .count();
    let matched: usize = report.repositories.iter().map(|r| r.matched).sum();
    let kept: usize = report.repositories.iter().map(|r| r.kept).sum();
    let failed_str = if failed > 0 {
        failed.to_string().red().bold().to_string()
    } else {
        failed.to_string()
    };

    println!("\n{}", "═".repeat(60));
    for repo in &report.repositories {
        println!("  {}", repository_line(repo, dry_run));
    }
    for (path, _) in &report.skipped {
        println!("  {:<40} {}", path, "skipped".dimmed());
    }
    if dry_run {
        println!(
            "{} Would delete {} of {} matched tags, keep {} tags in {} repositories ({} skipped)",
            "DRY RUN SUMMARY:".yellow().bold(),
            deleted.to_string().red().bold(),
            matched,
            kept.to_string().green().bold(),
            report.repositories.len(),
            report.skipped.len(),
        );
    } else {
        println!(
            "{} Deleted {} of {} matched tags, kept {} tags, {} failures in {} repositories ({} skipped)",
            "SUMMARY:".bold(),
            deleted.to_string().red().bold(),
            matched,
            kept.to_string().green().bold(),
            failed_str,
            report.repositories.len(),
            report.skipped.len(),
        );
    }
}

/// One summary line per processed repository
fn repository_line(repo: &RepoReport, dry_run: bool) -> String {
    if dry_run {
        format!(
            "{:<40} {} of {} matched tags would be deleted",
            repo.path, repo.tally.attempted, repo.matched
        )
    } else {
        format!(
            "{:<40} {}/{} deleted, {} matched",
            repo.path, repo.tally.succeeded, repo.tally.attempted, repo.matched
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(path: &str, attempted: usize, succeeded: usize) -> RepoReport {
        RepoReport {
            path: path.to_string(),
            matched: 12,
            kept: 12 - attempted,
            outcomes: Vec::new(),
            tally: Tally {
                attempted,
                succeeded,
            },
        }
    }

    #[test]
    fn test_repository_line_names_the_repository() {
        let line = repository_line(&report("group/app", 3, 2), false);
        assert!(line.starts_with("group/app"));
        assert!(line.contains("2/3 deleted, 12 matched"));
    }

    #[test]
    fn test_repository_line_dry_run() {
        let line = repository_line(&report("group/web", 4, 4), true);
        assert!(line.starts_with("group/web"));
        assert!(line.contains("4 of 12 matched tags would be deleted"));
    }
}
