use regex::Regex;
use tracing::debug;

use crate::error::AppError;
use crate::models::{Repository, Tag};

/// Never considered for deletion, whatever the patterns say.
pub const RESERVED_TAG: &str = "latest";

/// True if any rule matches anywhere in `candidate`. An empty list never matches;
/// callers decide what "no rules" means.
pub fn matches(candidate: &str, rules: &[Regex]) -> bool {
    rules.iter().any(|re| re.is_match(candidate))
}

/// Compiled include/exclude patterns
#[derive(Debug, Default)]
pub struct RuleSet {
    pub include_repositories: Vec<Regex>,
    pub include_tags: Vec<Regex>,
    pub exclude_tags: Vec<Regex>,
}

impl RuleSet {
    pub fn compile(
        include_repositories: &[String],
        include_tags: &[String],
        exclude_tags: &[String],
    ) -> Result<Self, AppError> {
        Ok(Self {
            include_repositories: compile_all(include_repositories)?,
            include_tags: compile_all(include_tags)?,
            exclude_tags: compile_all(exclude_tags)?,
        })
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, AppError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| AppError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// Keep the repositories whose path matches the include rules, in catalog order.
pub fn select_repositories(repos: Vec<Repository>, rules: &RuleSet) -> Vec<Repository> {
    repos
        .into_iter()
        .filter(|repo| {
            let include = &rules.include_repositories;
            if !include.is_empty() && !matches(&repo.path, include) {
                debug!(repository = %repo.path, "Skipped registry repository");
                false
            } else {
                debug!(repository = %repo.path, "Matched registry repository");
                true
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagVerdict {
    Matched,
    Reserved,
    Excluded,
    NotIncluded,
}

/// Decide one tag name. The order of the checks is significant: the reserved
/// tag goes first and exclusion beats inclusion.
pub fn classify_tag(name: &str, rules: &RuleSet) -> TagVerdict {
    if name == RESERVED_TAG {
        TagVerdict::Reserved
    } else if !rules.exclude_tags.is_empty() && matches(name, &rules.exclude_tags) {
        TagVerdict::Excluded
    } else if !rules.include_tags.is_empty() && !matches(name, &rules.include_tags) {
        TagVerdict::NotIncluded
    } else {
        TagVerdict::Matched
    }
}

/// Keep the tags eligible for retention planning, in listing order.
pub fn select_tags(tags: Vec<Tag>, rules: &RuleSet) -> Vec<Tag> {
    tags.into_iter()
        .filter(|tag| match classify_tag(&tag.name, rules) {
            TagVerdict::Matched => {
                debug!(tag = %tag.name, "Matched tag");
                true
            }
            TagVerdict::Reserved => {
                debug!("Skipped the {} tag", RESERVED_TAG);
                false
            }
            TagVerdict::Excluded => {
                debug!(tag = %tag.name, "Skipped tag because of exclude rule");
                false
            }
            TagVerdict::NotIncluded => {
                debug!(tag = %tag.name, "Skipped tag");
                false
            }
        })
        .collect()
}
