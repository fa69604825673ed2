use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::models::{KeepReason, RetentionPlan, Tag};

/// Keep-N and age cutoff rules, applied to the matched tags of one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// 0 disables count based retention
    pub keep_n: usize,
    /// Zero disables age based retention
    pub older_than: Duration,
}

impl RetentionPolicy {
    pub fn new(keep_n: usize, older_than: Duration) -> Self {
        Self { keep_n, older_than }
    }

    /// False when keep-N alone already retains every matched tag, so the
    /// repository can be skipped before any timestamp is fetched.
    pub fn exceeds_floor(&self, matched: usize) -> bool {
        self.keep_n == 0 || matched > self.keep_n
    }

    pub fn has_age_cutoff(&self) -> bool {
        self.older_than > Duration::zero()
    }

    /// Split `tags` into the deletion set and the kept set.
    ///
    /// Tags are ordered newest first (stable, so equal timestamps keep their
    /// listing order), the first `keep_n` are kept, and of the rest only tags
    /// strictly older than the cutoff are deleted. Tags without a creation
    /// timestamp are left out of both lists.
    pub fn plan(&self, tags: Vec<Tag>, now: DateTime<Utc>) -> RetentionPlan {
        if !self.exceeds_floor(tags.len()) {
            return RetentionPlan {
                to_delete: Vec::new(),
                to_keep: tags.into_iter().map(|t| (t, KeepReason::Newest)).collect(),
            };
        }

        let mut dated: Vec<(DateTime<Utc>, Tag)> = Vec::with_capacity(tags.len());
        for tag in tags {
            match tag.created_at {
                Some(created) => dated.push((created, tag)),
                None => warn!(tag = %tag.path, "Tag has no creation time, leaving it alone"),
            }
        }
        dated.sort_by(|a, b| b.0.cmp(&a.0));

        let keep_count = self.keep_n.min(dated.len());
        if self.keep_n > 0 {
            debug!("The latest {} matched tags will be kept", self.keep_n);
        }
        let mut to_keep: Vec<(Tag, KeepReason)> = Vec::new();
        let rest = dated.split_off(keep_count);
        to_keep.extend(dated.into_iter().map(|(_, t)| (t, KeepReason::Newest)));

        let mut to_delete = Vec::with_capacity(rest.len());
        for (created, tag) in rest {
            let age = now - created;
            if self.has_age_cutoff() && age <= self.older_than {
                debug!(
                    tag = %tag.name,
                    age_hours = age.num_hours(),
                    "Tag will be kept because it is not older than the cutoff"
                );
                to_keep.push((tag, KeepReason::TooRecent(age)));
            } else {
                to_delete.push(tag);
            }
        }

        RetentionPlan { to_delete, to_keep }
    }
}
