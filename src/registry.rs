use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LINK};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;
use crate::models::{Repository, Tag, TagDetail};

const PER_PAGE: &str = "100";
const PRIVATE_TOKEN: &str = "private-token";

/// The registry operations the pruner depends on
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// All container repositories of the project, in API order
    async fn list_repositories(&self) -> Result<Vec<Repository>>;

    /// All tags of a repository; timestamps are not filled in
    async fn list_tags(&self, repo: &Repository) -> Result<Vec<Tag>>;

    async fn tag_created_at(&self, repo: &Repository, tag: &str) -> Result<DateTime<Utc>>;

    async fn delete_tag(&self, repo: &Repository, tag: &str) -> Result<()>;
}

/// GitLab v4 container registry API client
pub struct GitLabClient {
    client: Client,
    base_url: Url,
    project: String,
}

impl GitLabClient {
    pub fn new(
        base_url: &str,
        project: &str,
        token: Option<&str>,
        insecure: bool,
    ) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(token).map_err(|_| AppError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(PRIVATE_TOKEN), value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self {
            client,
            base_url,
            project: project.to_string(),
        })
    }

    /// Build `<base>/api/v4/projects/<project>/registry/repositories/<segments...>`,
    /// percent-encoding each segment on its own so `group/app` becomes `group%2Fapp`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(["api", "v4", "projects", self.project.as_str()])
            .extend(["registry", "repositories"])
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response> {
        debug!("{} {}", method, url);
        let resp = self
            .client
            .request(method.clone(), url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to {} {}", method, url))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("{} {} returned status {}", method, url, status);
        }
        Ok(resp)
    }

    /// GET every page of a listing endpoint, following `Link: <...>; rel="next"`.
    async fn get_all_pages<T: DeserializeOwned>(&self, mut url: Url) -> Result<Vec<T>> {
        url.query_pairs_mut().append_pair("per_page", PER_PAGE);
        let mut items = Vec::new();

        loop {
            let resp = self.send(Method::GET, url.clone()).await?;
            let next = resp
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_next_link);

            let page: Vec<T> = resp
                .json()
                .await
                .with_context(|| format!("Failed to parse JSON from {}", url))?;
            items.extend(page);

            match next {
                Some(next) => url = self.resolve_url(&next)?,
                None => break,
            }
        }

        Ok(items)
    }

    /// Resolve a possibly relative link against the base URL
    fn resolve_url(&self, link: &str) -> Result<Url> {
        self.base_url
            .join(link)
            .with_context(|| format!("Invalid pagination link {}", link))
    }
}

#[async_trait]
impl RegistryApi for GitLabClient {
    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let url = self.endpoint(&[])?;
        self.get_all_pages(url)
            .await
            .context("List registry repositories error")
    }

    async fn list_tags(&self, repo: &Repository) -> Result<Vec<Tag>> {
        let id = repo.id.to_string();
        let url = self.endpoint(&[id.as_str(), "tags"])?;
        self.get_all_pages(url)
            .await
            .with_context(|| format!("List registry repository tags failed, path: {}", repo.path))
    }

    async fn tag_created_at(&self, repo: &Repository, tag: &str) -> Result<DateTime<Utc>> {
        let id = repo.id.to_string();
        let url = self.endpoint(&[id.as_str(), "tags", tag])?;
        let detail: TagDetail = self
            .send(Method::GET, url)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse tag detail for {}:{}", repo.path, tag))?;

        detail
            .created_at
            .with_context(|| format!("Tag detail for {}:{} has no created_at", repo.path, tag))
    }

    async fn delete_tag(&self, repo: &Repository, tag: &str) -> Result<()> {
        let id = repo.id.to_string();
        let url = self.endpoint(&[id.as_str(), "tags", tag])?;
        self.send(Method::DELETE, url).await?;
        Ok(())
    }
}

/// Pick the `rel="next"` target out of an RFC 5988 Link header, which may
/// list several comma separated links.
fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let (target, params) = link.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim().eq_ignore_ascii_case("rel=\"next\""));
        if !is_next {
            return None;
        }
        let target = target.trim();
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
