//! In-memory registry used by the tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Repository, Tag};
use crate::registry::RegistryApi;

#[derive(Default)]
pub struct FakeRegistry {
    pub repositories: Vec<Repository>,
    tags: HashMap<u64, Vec<(Tag, DateTime<Utc>)>>,
    pub fail_repositories: bool,
    pub fail_list: HashSet<u64>,
    pub fail_fetch: HashSet<String>,
    pub fail_delete: HashSet<String>,
    fetched: Mutex<Vec<String>>,
    delete_calls: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repository(&mut self, id: u64, path: &str, tags: &[(&str, DateTime<Utc>)]) {
        self.repositories.push(Repository {
            id,
            path: path.to_string(),
        });
        let tags = tags
            .iter()
            .map(|(name, created)| {
                let tag = Tag {
                    name: name.to_string(),
                    path: format!("{}:{}", path, name),
                    created_at: None,
                };
                (tag, *created)
            })
            .collect();
        self.tags.insert(id, tags);
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistryApi for FakeRegistry {
    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        if self.fail_repositories {
            return Err(anyhow!("catalog unavailable"));
        }
        Ok(self.repositories.clone())
    }

    async fn list_tags(&self, repo: &Repository) -> Result<Vec<Tag>> {
        if self.fail_list.contains(&repo.id) {
            return Err(anyhow!("cannot list tags of {}", repo.path));
        }
        Ok(self
            .tags
            .get(&repo.id)
            .map(|tags| tags.iter().map(|(t, _)| t.clone()).collect())
            .unwrap_or_default())
    }

    async fn tag_created_at(&self, repo: &Repository, tag: &str) -> Result<DateTime<Utc>> {
        self.fetched.lock().unwrap().push(tag.to_string());
        if self.fail_fetch.contains(tag) {
            return Err(anyhow!("detail of {} unavailable", tag));
        }
        self.tags
            .get(&repo.id)
            .and_then(|tags| tags.iter().find(|(t, _)| t.name == tag))
            .map(|(_, created)| *created)
            .ok_or_else(|| anyhow!("404 tag {} not found", tag))
    }

    async fn delete_tag(&self, _repo: &Repository, tag: &str) -> Result<()> {
        self.delete_calls.lock().unwrap().push(tag.to_string());
        if self.fail_delete.contains(tag) {
            return Err(anyhow!("500 deleting {}", tag));
        }
        self.deleted.lock().unwrap().push(tag.to_string());
        Ok(())
    }
}
