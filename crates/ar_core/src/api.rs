use async_trait::async_trait;
use crate::types::{Article, ArticlePage};
use crate::Result;

#[async_trait]
pub trait ArticleApi: Send + Sync {
    /// Fetch one page of articles, `limit` articles per page
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<ArticlePage>;

    /// Fetch a single article by its identifier
    async fn fetch_article(&self, id: &str) -> Result<Article>;
}
