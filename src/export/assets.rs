//! Fetching the fonts and icons a tree links to.

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Anything that can return the bytes behind an asset URL.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Loads assets over HTTP. Non-success statuses are load failures.
#[derive(Debug, Clone, Default)]
pub struct HttpAssetLoader {
    client: reqwest::Client,
}

impl HttpAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetLoader for HttpAssetLoader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let failed = |err: reqwest::Error| Error::AssetLoad {
            url: url.to_string(),
            reason: err.to_string(),
        };

        tracing::debug!(url, "fetching asset");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(failed)?;
        let bytes = response.bytes().await.map_err(failed)?;
        Ok(bytes.to_vec())
    }
}
