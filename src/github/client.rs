use crate::github::types::{ApiMessage, CommitRecord, ContributorStats};
use crate::model::{Milestone, PortfolioError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("milestone-portfolio/", env!("CARGO_PKG_VERSION"));

/// Outcome of a successful list request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Ready(Vec<T>),
    /// HTTP 202: GitHub is still computing the statistics.
    Computing,
}

pub trait GithubApi {
    async fn commits(&self, milestone: &Milestone) -> Result<ApiResponse<CommitRecord>>;
    async fn contributor_stats(
        &self,
        milestone: &Milestone,
    ) -> Result<ApiResponse<ContributorStats>>;
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(api_url: impl ToString, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_V3));
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.to_string().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse<T>> {
        let mut request = self.http.get(format!("{}{}", self.api_url, path)).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            return Ok(ApiResponse::Computing);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(ApiResponse::Ready(vec![]));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map(|m| m.message)
                .unwrap_or(body);
            return Err(PortfolioError::Status(status, message));
        }
        Ok(ApiResponse::Ready(response.json::<Vec<T>>().await?))
    }
}

impl GithubApi for GithubClient {
    async fn commits(&self, milestone: &Milestone) -> Result<ApiResponse<CommitRecord>> {
        let path = format!("/repos/{}/{}/commits", milestone.owner, milestone.repo);
        self.get_list(&path, &[("sha", milestone.branch.as_str())]).await
    }

    async fn contributor_stats(
        &self,
        milestone: &Milestone,
    ) -> Result<ApiResponse<ContributorStats>> {
        let path = format!("/repos/{}/{}/stats/contributors", milestone.owner, milestone.repo);
        self.get_list(&path, &[]).await
    }
}
