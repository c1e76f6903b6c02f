use std::sync::Arc;

use ar_core::{Article, ArticleApi, FetchState, Result};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error, info, warn};

pub const DETAIL_ERROR: &str = "Failed to load article.";

struct ArticleResponse {
    id: String,
    result: Result<Article>,
}

#[derive(Debug, Clone, Copy)]
pub struct DetailSnapshot<'a> {
    pub id: Option<&'a str>,
    pub state: &'a FetchState<Article>,
}

impl<'a> DetailSnapshot<'a> {
    pub fn article(&self) -> Option<&'a Article> {
        self.state.value()
    }
}

/// Resolves and holds exactly one article.
///
/// Responses are only applied while their id is still the one most recently
/// passed to [`load`](Self::load), so a slow answer for a previous id never
/// shows up under a new one.
pub struct DetailController {
    api: Arc<dyn ArticleApi>,
    id: Option<String>,
    state: FetchState<Article>,
    in_flight: FuturesUnordered<BoxFuture<'static, ArticleResponse>>,
}

impl DetailController {
    pub fn new(api: Arc<dyn ArticleApi>) -> Self {
        Self {
            api,
            id: None,
            state: FetchState::Idle,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn state(&self) -> &FetchState<Article> {
        &self.state
    }

    pub fn article(&self) -> Option<&Article> {
        self.state.value()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn snapshot(&self) -> DetailSnapshot<'_> {
        DetailSnapshot {
            id: self.id.as_deref(),
            state: &self.state,
        }
    }

    /// Discard whatever is held and fetch article `id`.
    pub fn load(&mut self, id: &str) {
        debug!("📰 Requesting article {}", id);
        self.id = Some(id.to_string());
        self.state = FetchState::Loading;

        let api = Arc::clone(&self.api);
        let id = id.to_string();
        self.in_flight.push(
            async move {
                let result = api.fetch_article(&id).await;
                ArticleResponse { id, result }
            }
            .boxed(),
        );
    }

    /// Wait for the next in-flight fetch to resolve and apply it. Returns
    /// false when nothing is in flight.
    pub async fn settle(&mut self) -> bool {
        match self.in_flight.next().await {
            Some(response) => {
                self.apply(response);
                true
            }
            None => false,
        }
    }

    pub async fn settle_all(&mut self) {
        while self.settle().await {}
    }

    fn apply(&mut self, response: ArticleResponse) {
        if self.id.as_deref() != Some(response.id.as_str()) {
            warn!("⏭️ Dropping response for article {} (now showing {:?})", response.id, self.id);
            return;
        }
        match response.result {
            Ok(article) => {
                info!("✨ Loaded article {}: {}", article.id, article.title);
                self.state = FetchState::Success(article);
            }
            Err(e) => {
                error!(status = ?e.status(), "Error fetching article {}: {}", response.id, e);
                self.state = FetchState::Error(DETAIL_ERROR.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{article, ScriptedApi};
    use ar_core::ArticleStatus;

    fn with_references() -> Article {
        let mut article = article("65a1f0c2", "Training AI", ArticleStatus::AiUpdated);
        article.references = Some(vec![
            "https://example.com/one".to_string(),
            "https://example.com/two".to_string(),
        ]);
        article
    }

    #[tokio::test]
    async fn test_load_holds_full_article() {
        let api = Arc::new(ScriptedApi::default().with_article(with_references()));
        let mut detail = DetailController::new(api.clone());
        assert_eq!(detail.state(), &FetchState::Idle);

        detail.load("65a1f0c2");
        assert!(detail.state().is_loading());
        assert!(detail.article().is_none());

        detail.settle_all().await;
        let article = detail.article().unwrap();
        assert_eq!(article.title, "Training AI");
        assert_eq!(article.references().len(), 2);
        assert_eq!(detail.snapshot().id, Some("65a1f0c2"));
    }

    #[tokio::test]
    async fn test_not_found_holds_no_article() {
        let api = Arc::new(ScriptedApi::default());
        let mut detail = DetailController::new(api.clone());

        detail.load("abc123");
        detail.settle_all().await;

        assert_eq!(detail.state(), &FetchState::Error(DETAIL_ERROR.to_string()));
        assert!(detail.article().is_none());
        assert!(detail.snapshot().article().is_none());
    }

    #[tokio::test]
    async fn test_new_id_discards_previous_article() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_article(article("a", "First", ArticleStatus::Original))
                .with_article(article("b", "Second", ArticleStatus::Original)),
        );
        let mut detail = DetailController::new(api.clone());
        detail.load("a");
        detail.settle_all().await;
        assert_eq!(detail.article().unwrap().id, "a");

        detail.load("b");
        assert!(detail.article().is_none());
        assert!(detail.state().is_loading());
        detail.settle_all().await;
        assert_eq!(detail.article().unwrap().id, "b");
    }

    #[tokio::test]
    async fn test_failure_after_success_drops_article() {
        let api = Arc::new(ScriptedApi::default().with_article(article("a", "First", ArticleStatus::Original)));
        let mut detail = DetailController::new(api.clone());
        detail.load("a");
        detail.settle_all().await;

        detail.load("missing");
        detail.settle_all().await;
        assert!(detail.article().is_none());
        assert_eq!(detail.state().error(), Some(DETAIL_ERROR));
    }

    #[tokio::test]
    async fn test_late_response_for_previous_id_is_dropped() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_article(article("a", "First", ArticleStatus::Original))
                .with_article(article("b", "Second", ArticleStatus::Original)),
        );
        let release_a = api.hold("article:a");
        let mut detail = DetailController::new(api.clone());

        detail.load("a");
        detail.load("b");
        assert!(detail.settle().await);
        assert_eq!(detail.article().unwrap().id, "b");

        release_a.send(()).unwrap();
        assert!(detail.settle().await);
        assert_eq!(detail.article().unwrap().id, "b");
        assert_eq!(api.calls().len(), 2);
    }
}
