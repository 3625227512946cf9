//! GitHub search and README client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{PluginError, Result};

use super::types::{GitHubPluginSummary, TrustLevel};

const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";

/// Topic plugin repositories tag themselves with.
const PLUGIN_TOPIC: &str = "edbp-plugin";

/// Sentinel text returned when a repository has no README; callers render
/// it instead of handling an error.
pub const README_NOT_FOUND: &str = "README not found.";

/// Client for the remote discovery endpoint.
pub struct HubClient {
    api_url: String,
    raw_url: String,
    http_client: Client,
}

impl HubClient {
    pub fn new() -> Self {
        Self::with_base_urls(GITHUB_API_URL, GITHUB_RAW_URL)
    }

    /// Override endpoints (tests point these at a local mock server).
    pub fn with_base_urls(api_url: impl Into<String>, raw_url: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("edbp-plugins")
            .build()
            .expect("failed to create HTTP client");
        Self {
            api_url: api_url.into(),
            raw_url: raw_url.into(),
            http_client,
        }
    }

    /// Search the index for candidate plugins, most-starred first.
    ///
    /// Items missing a repository path or owner are dropped; other
    /// missing fields default, matching the API's lenient shape.
    pub async fn search(&self) -> Result<Vec<GitHubPluginSummary>> {
        let url = format!(
            "{}/search/repositories?q=topic:{}&sort=stars&order=desc&per_page=30",
            self.api_url, PLUGIN_TOPIC
        );
        debug!(topic = PLUGIN_TOPIC, "searching plugin index");

        let resp = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| PluginError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(PluginError::Network(format!(
                "plugin search returned {}",
                resp.status()
            )));
        }
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| PluginError::Network(e.to_string()))?;

        let summaries = parse_items(&body);
        debug!(count = summaries.len(), "plugin search complete");
        Ok(summaries)
    }

    /// Fetch a repository's README text.
    ///
    /// Tries the requested branch (default `main`) and falls back to
    /// `main` for repositories whose default branch moved. A missing
    /// README resolves to [`README_NOT_FOUND`] rather than an error;
    /// only transport failures are reported as [`PluginError::Network`].
    pub async fn fetch_readme(&self, full_name: &str, branch: Option<&str>) -> Result<String> {
        let branch = branch.unwrap_or("main");
        match self.fetch_raw_readme(full_name, branch).await? {
            Some(text) => Ok(text),
            None if branch != "main" => Ok(self
                .fetch_raw_readme(full_name, "main")
                .await?
                .unwrap_or_else(|| README_NOT_FOUND.to_string())),
            None => Ok(README_NOT_FOUND.to_string()),
        }
    }

    async fn fetch_raw_readme(&self, full_name: &str, branch: &str) -> Result<Option<String>> {
        let url = format!("{}/{}/{}/README.md", self.raw_url, full_name, branch);
        let resp = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| PluginError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            debug!(repo = full_name, branch, status = %resp.status(), "no README at branch");
            return Ok(None);
        }
        let text = resp
            .text()
            .await
            .map_err(|e| PluginError::Network(e.to_string()))?;
        Ok(Some(text))
    }
}

impl Default for HubClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a repository-search response body into summaries, skipping items
/// without the fields discovery cannot work without.
fn parse_items(body: &serde_json::Value) -> Vec<GitHubPluginSummary> {
    let Some(items) = body.get("items").and_then(|v| v.as_array()) else {
        warn!("plugin search response missing `items`");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let full_name = item.get("full_name")?.as_str()?.to_string();
            let owner = item
                .get("owner")
                .and_then(|o| o.get("login"))
                .and_then(|v| v.as_str())?
                .to_string();
            let name = item
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or(&full_name)
                .to_string();
            let description = item
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let stars = item
                .get("stargazers_count")
                .and_then(|v| v.as_u64())
                .unwrap_or(0);
            let default_branch = item
                .get("default_branch")
                .and_then(|v| v.as_str())
                .unwrap_or("main")
                .to_string();
            let repository_url = item
                .get("html_url")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("https://github.com/{full_name}"));

            Some(GitHubPluginSummary {
                name,
                trust_level: TrustLevel::for_owner(&owner),
                author: owner,
                full_name,
                default_branch,
                stars,
                description,
                repository_url,
            })
        })
        .collect()
}

/// Correlates search responses with the newest request so the
/// presentation layer can discard results that arrive out of order.
#[derive(Debug, Default)]
pub struct SearchTicket {
    generation: AtomicU64,
}

impl SearchTicket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for a new search, superseding all earlier tokens.
    pub fn issue(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `token` still belongs to the latest search.
    pub fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }
}
