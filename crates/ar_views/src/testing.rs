use std::collections::HashMap;
use std::sync::Mutex;

use ar_core::{Article, ArticleApi, ArticlePage, ArticleStatus, Error, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use tokio::sync::oneshot;

pub(crate) fn article(id: &str, title: &str, status: ArticleStatus) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        excerpt: format!("Excerpt of {}", title),
        content: format!("{}\nsecond line", title),
        status,
        published_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap(),
        references: None,
        source: Some("BeyondChats Blog".to_string()),
    }
}

/// `count` original articles with ids `p{page}-{i}`.
pub(crate) fn numbered_page(page: u32, total_pages: u32, count: usize) -> ArticlePage {
    ArticlePage {
        articles: (0..count)
            .map(|i| {
                article(
                    &format!("p{}-{}", page, i),
                    &format!("Page {} article {}", page, i),
                    ArticleStatus::Original,
                )
            })
            .collect(),
        page,
        total_pages,
    }
}

/// In-memory `ArticleApi` whose responses can be held back until released,
/// so tests decide the order in which fetches resolve. Unscripted pages and
/// articles answer with a 404.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    pages: Mutex<HashMap<u32, ArticlePage>>,
    articles: Mutex<HashMap<String, Article>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub(crate) fn with_page(self, page: ArticlePage) -> Self {
        self.pages.lock().unwrap().insert(page.page, page);
        self
    }

    pub(crate) fn with_article(self, article: Article) -> Self {
        self.articles.lock().unwrap().insert(article.id.clone(), article);
        self
    }

    /// Hold the next request for `key` (`page:N` or `article:ID`) until the
    /// returned sender fires.
    pub(crate) fn hold(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn pass_gate(&self, key: String) {
        let gate = self.gates.lock().unwrap().remove(&key);
        self.calls.lock().unwrap().push(key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait]
impl ArticleApi for ScriptedApi {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<ArticlePage> {
        self.pass_gate(format!("page:{}", page)).await;
        let found = self.pages.lock().unwrap().get(&page).cloned();
        found
            .map(|mut found| {
                found.articles.truncate(limit as usize);
                found
            })
            .ok_or_else(|| Error::Server {
                status: 404,
                url: format!("/api/articles?page={}&limit={}", page, limit),
            })
    }

    async fn fetch_article(&self, id: &str) -> Result<Article> {
        self.pass_gate(format!("article:{}", id)).await;
        let found = self.articles.lock().unwrap().get(id).cloned();
        found.ok_or_else(|| Error::Server {
            status: 404,
            url: format!("/api/articles/{}", id),
        })
    }
}
