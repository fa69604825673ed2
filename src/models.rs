use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GET /projects/:id/registry/repositories item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub path: String,
}

/// GET /projects/:id/registry/repositories/:repository_id/tags item.
///
/// The listing never carries `created_at`; it is attached once from the
/// tag detail endpoint before planning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// GET /projects/:id/registry/repositories/:repository_id/tags/:tag_name
#[derive(Debug, Deserialize)]
pub struct TagDetail {
    pub created_at: Option<DateTime<Utc>>,
}

/// Why a matched tag survived planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// Among the N most recently created matched tags
    Newest,
    /// Not older than the age cutoff; carries its age
    TooRecent(chrono::Duration),
}

/// Result of planning one repository, both lists newest first
#[derive(Debug, Clone, Default)]
pub struct RetentionPlan {
    pub to_delete: Vec<Tag>,
    pub to_keep: Vec<(Tag, KeepReason)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    DryRun,
    Failed(String),
}

/// Per-repository completion tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub attempted: usize,
    pub succeeded: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &DeletionOutcome) {
        self.attempted += 1;
        if !matches!(outcome, DeletionOutcome::Failed(_)) {
            self.succeeded += 1;
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}
