//! Remote icon metadata source.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default location of the devicon metadata list.
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/devicons/devicon/master/devicon.json";

/// One icon as published by the remote metadata list.
///
/// Only the fields the catalog needs are kept; anything else in the payload
/// is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIcon {
    pub name: String,
    #[serde(default)]
    pub altnames: Vec<String>,
    #[serde(default)]
    pub versions: RemoteVersions,
}

/// Rendering variants available for a remote icon.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteVersions {
    #[serde(default)]
    pub svg: Vec<String>,
}

/// Anything that can produce the remote icon list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RemoteIcon>>;
}

/// Fetches the icon list with a single HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpCatalogSource {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<RemoteIcon>> {
        tracing::debug!(url = %self.url, "fetching icon catalog");
        let icons = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RemoteIcon>>()
            .await?;
        Ok(icons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_and_decodes_icon_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devicon.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "name": "react",
                    "altnames": ["reactjs"],
                    "tags": ["framework"],
                    "versions": { "svg": ["original", "original-wordmark"], "font": ["original"] }
                },
                { "name": "rust", "altnames": [], "versions": { "svg": ["original", "plain"] } }
            ])))
            .mount(&server)
            .await;

        let source = HttpCatalogSource::new(format!("{}/devicon.json", server.uri()));
        let icons = source.fetch().await.unwrap();

        assert_eq!(icons.len(), 2);
        assert_eq!(icons[0].altnames, vec!["reactjs".to_string()]);
        assert_eq!(icons[1].versions.svg, vec!["original", "plain"]);
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpCatalogSource::new(format!("{}/devicon.json", server.uri()));
        assert!(source.fetch().await.is_err());
    }

    #[tokio::test]
    async fn malformed_payload_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let source = HttpCatalogSource::new(format!("{}/devicon.json", server.uri()));
        assert!(source.fetch().await.is_err());
    }
}
