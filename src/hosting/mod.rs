//! Client for the Git hosting server's REST API.
//!
//! Covers the three calls a preview deployment needs: listing branches
//! of the previews repository, deleting retired ones, and pointing the
//! Pages feature at a branch.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::HostingSection;
use crate::error::{Result, VorschauError};

/// HTTP timeout for hosting API calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const PAGE_SIZE: usize = 50;

/// A branch of the previews repository as reported by the server.
#[derive(Debug, Clone)]
pub struct BranchInfo {
    pub name: String,
    pub sha: String,
    pub committed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct BranchResponse {
    name: String,
    commit: CommitResponse,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    id: String,
    timestamp: DateTime<Utc>,
}

impl From<BranchResponse> for BranchInfo {
    fn from(response: BranchResponse) -> Self {
        Self {
            name: response.name,
            sha: response.commit.id,
            committed_at: response.commit.timestamp,
        }
    }
}

#[derive(Debug)]
pub struct HostingClient {
    agent: ureq::Agent,
    api_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl HostingClient {
    /// A token passed explicitly (flag or VORSCHAU_TOKEN) wins over one
    /// stored in the config file.
    pub fn new(hosting: &HostingSection, token_flag: Option<&str>) -> Result<Self> {
        let token = token_flag
            .map(str::to_string)
            .or_else(|| hosting.token.clone())
            .ok_or_else(|| {
                VorschauError::Hosting(
                    "no API token configured (set VORSCHAU_TOKEN or [hosting] token)".to_string(),
                )
            })?;

        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .timeout_global(Some(HTTP_TIMEOUT))
                .build(),
        );

        Ok(Self {
            agent,
            api_url: hosting.api_url.trim_end_matches('/').to_string(),
            owner: hosting.owner.clone(),
            repo: hosting.repo.clone(),
            token,
        })
    }

    pub fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        let auth = format!("token {}", self.token);
        let mut branches = Vec::new();
        let mut page = 1;

        loop {
            let url = self.repo_url(&format!("/branches?page={page}&limit={PAGE_SIZE}"));
            let mut response = self
                .agent
                .get(&url)
                .header("Authorization", auth.as_str())
                .call()
                .map_err(|e| VorschauError::Hosting(format!("GET {url}: {e}")))?;
            let batch: Vec<BranchResponse> = response
                .body_mut()
                .read_json()
                .map_err(|e| VorschauError::Hosting(format!("invalid branch list: {e}")))?;

            let last_page = batch.len() < PAGE_SIZE;
            branches.extend(batch.into_iter().map(BranchInfo::from));
            if last_page {
                return Ok(branches);
            }
            page += 1;
        }
    }

    pub fn delete_branch(&self, name: &str) -> Result<()> {
        let url = self.repo_url(&format!("/branches/{}", encode_branch(name)));
        let auth = format!("token {}", self.token);
        self.agent
            .delete(&url)
            .header("Authorization", auth.as_str())
            .call()
            .map_err(|e| VorschauError::Hosting(format!("DELETE {url}: {e}")))?;
        Ok(())
    }

    /// Point the repository's Pages feature at `branch`.
    pub fn set_pages_branch(&self, branch: &str) -> Result<()> {
        let url = self.repo_url("/pages");
        let auth = format!("token {}", self.token);
        self.agent
            .post(&url)
            .header("Authorization", auth.as_str())
            .send_json(pages_payload(branch))
            .map_err(|e| VorschauError::Hosting(format!("POST {url}: {e}")))?;
        Ok(())
    }

    fn repo_url(&self, tail: &str) -> String {
        format!(
            "{}/api/v1/repos/{}/{}{tail}",
            self.api_url, self.owner, self.repo
        )
    }
}

/// Branch names carry slashes, which must be escaped in the URL path.
fn encode_branch(name: &str) -> String {
    name.replace('%', "%25").replace('/', "%2F")
}

/// Body of the Pages toggle request.
fn pages_payload(branch: &str) -> serde_json::Value {
    serde_json::json!({ "branch": branch, "enabled": true })
}
