use ar_core::{Article, ArticleApi, ArticlePage, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::wire;

/// `ArticleApi` over the backend's REST endpoints.
pub struct HttpArticleApi {
    client: Client,
    config: ClientConfig,
}

impl HttpArticleApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn articles_url(&self) -> Result<Url> {
        self.config
            .base_url
            .join("api/articles")
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.config.base_url, e)))
    }

    fn article_url(&self, id: &str) -> Result<Url> {
        if id.trim().is_empty() {
            return Err(Error::InvalidUrl("empty article identifier".to_string()));
        }
        let mut url = self.articles_url()?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.config.base_url.to_string()))?
            .push(id);
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>> {
        debug!("🌐 GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Server {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(body.to_vec())
    }
}

impl fmt::Debug for HttpArticleApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpArticleApi")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.config.base_url.as_str())
            .finish()
    }
}

#[async_trait]
impl ArticleApi for HttpArticleApi {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<ArticlePage> {
        let mut url = self.articles_url()?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        let body = self.get_bytes(url).await?;
        wire::decode_page(&body, page)
    }

    async fn fetch_article(&self, id: &str) -> Result<Article> {
        let url = self.article_url(id)?;
        let body = self.get_bytes(url).await?;
        wire::decode_article(&body)
    }
}
