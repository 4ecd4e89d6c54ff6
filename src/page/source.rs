use crate::model::{CacheKey, PortfolioError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Where the page reads its pre-generated files from. Locations are derived
/// from the [`CacheKey`] alone.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn location(&self, key: &CacheKey) -> String;

    async fn load(&self, key: &CacheKey) -> Result<Vec<u8>>;
}

pub async fn load_json<T: DeserializeOwned>(source: &dyn DataSource, key: &CacheKey) -> Result<T> {
    let bytes = source.load(key).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// The public directory on disk, i.e. the parent of `data/`.
#[derive(Debug, Clone)]
pub struct StaticDir {
    root: PathBuf,
}

impl StaticDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DataSource for StaticDir {
    fn location(&self, key: &CacheKey) -> String {
        self.root.join(key.data_path()).display().to_string()
    }

    async fn load(&self, key: &CacheKey) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.root.join(key.data_path())).await?)
    }
}

/// The deployed site, addressed by its base URL.
#[derive(Debug, Clone)]
pub struct StaticHttp {
    client: Client,
    base_url: String,
}

impl StaticHttp {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }
}

#[async_trait]
impl DataSource for StaticHttp {
    fn location(&self, key: &CacheKey) -> String {
        format!("{}{}", self.base_url, key.data_path())
    }

    async fn load(&self, key: &CacheKey) -> Result<Vec<u8>> {
        let response = self.client.get(self.location(key)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            return Err(PortfolioError::Status(status, reason));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
