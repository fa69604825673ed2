use tracing::debug;

use crate::cli::Cli;
use crate::duration::parse_duration;
use crate::error::AppError;
use crate::filter::RuleSet;
use crate::planner::RetentionPolicy;

/// Everything a sweep needs, fixed once at startup
#[derive(Debug)]
pub struct Config {
    pub base_url: String,
    pub token: Option<String>,
    pub project: String,
    pub insecure: bool,
    pub rules: RuleSet,
    pub policy: RetentionPolicy,
    pub jobs: usize,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let project = cli
            .project
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(AppError::MissingProject)?
            .to_string();

        let older_than = parse_duration(&cli.older_than)?;
        let rules = RuleSet::compile(&cli.registries, &cli.tags, &cli.excludes)?;

        Ok(Self {
            base_url: cli.base_url.clone(),
            token: cli.token.clone().filter(|t| !t.is_empty()),
            project,
            insecure: cli.insecure,
            rules,
            policy: RetentionPolicy::new(cli.keep_n, older_than),
            jobs: cli.jobs.max(1),
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    pub fn log_settings(&self) {
        debug!("Gitlab base url: {}", self.base_url);
        if self.token.is_some() {
            debug!("Gitlab private token: **HIDDEN**");
        }
        debug!("Gitlab project ID: {}", self.project);
        debug!("Keep N: {}", self.policy.keep_n);
        if self.policy.has_age_cutoff() {
            debug!("Older than: {}h", self.policy.older_than.num_hours());
        }
        debug!("Dry run: {}", self.dry_run);
    }
}
