use std::sync::Arc;

use ar_core::{filter, Article, ArticleApi, ArticlePage, ArticleStatus, Error, FetchState, FilterCriteria, Result};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error, info, warn};

use crate::options::{ResponseOrdering, ViewOptions};

pub const LIST_ERROR: &str = "Failed to load articles. Check if backend is running.";

struct PageResponse {
    seq: u64,
    page: u32,
    result: Result<ArticlePage>,
}

/// Render-ready view of a [`ListController`].
#[derive(Debug, Clone, Copy)]
pub struct ListSnapshot<'a> {
    pub page: u32,
    pub total_pages: u32,
    /// The payload of a successful fetch lives in `articles`, so it survives a
    /// later failure.
    pub state: &'a FetchState<()>,
    pub articles: &'a [Article],
    pub filter: &'a FilterCriteria,
    pub can_prev: bool,
    pub can_next: bool,
}

/// Holds the current page of articles, the client-side filter and the
/// visible (filtered) articles.
///
/// Page fetches are queued as futures owned by the controller and applied by
/// [`settle`](Self::settle) in the order they resolve. Nothing is cancelled
/// when a new page is requested. With the default
/// [`ResponseOrdering::LastResolved`], requesting page 1 and then page 2 ends
/// on page 1 if page 1's response arrives last.
pub struct ListController {
    api: Arc<dyn ArticleApi>,
    options: ViewOptions,
    page: u32,
    held: ArticlePage,
    filter: FilterCriteria,
    visible: Vec<Article>,
    state: FetchState<()>,
    issued: u64,
    in_flight: FuturesUnordered<BoxFuture<'static, PageResponse>>,
}

impl ListController {
    pub fn new(api: Arc<dyn ArticleApi>, options: ViewOptions) -> Self {
        let held = ArticlePage::default();
        Self {
            api,
            options,
            page: held.page,
            held,
            filter: FilterCriteria::default(),
            visible: Vec::new(),
            state: FetchState::Idle,
            issued: 0,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.held.total_pages
    }

    pub fn state(&self) -> &FetchState<()> {
        &self.state
    }

    /// Articles of the held page, unfiltered.
    pub fn held(&self) -> &[Article] {
        &self.held.articles
    }

    pub fn visible(&self) -> &[Article] {
        &self.visible
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.held.total_pages
    }

    pub fn snapshot(&self) -> ListSnapshot<'_> {
        ListSnapshot {
            page: self.page,
            total_pages: self.held.total_pages,
            state: &self.state,
            articles: &self.visible,
            filter: &self.filter,
            can_prev: self.can_prev(),
            can_next: self.can_next(),
        }
    }

    /// Request page `page`. The page number moves immediately and the
    /// controller reports `Loading` until a response is applied.
    pub fn set_page(&mut self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(Error::InvalidPage(page));
        }
        self.page = page;
        self.state = FetchState::Loading;
        self.issued += 1;

        let seq = self.issued;
        let limit = self.options.page_size;
        let api = Arc::clone(&self.api);
        debug!("📄 Requesting page {} (limit {}, request #{})", page, limit, seq);
        self.in_flight.push(
            async move {
                let result = api.fetch_page(page, limit).await;
                PageResponse { seq, page, result }
            }
            .boxed(),
        );
        Ok(())
    }

    /// Returns false without fetching when already on the last page.
    pub fn next_page(&mut self) -> Result<bool> {
        if !self.can_next() {
            return Ok(false);
        }
        self.set_page(self.page + 1)?;
        Ok(true)
    }

    /// Returns false without fetching when already on the first page.
    pub fn prev_page(&mut self) -> Result<bool> {
        if !self.can_prev() {
            return Ok(false);
        }
        self.set_page(self.page - 1)?;
        Ok(true)
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.filter = criteria;
        self.refilter();
    }

    pub fn set_search(&mut self, search_term: impl Into<String>) {
        let criteria = FilterCriteria::new(search_term, self.filter.status);
        self.set_filter(criteria);
    }

    pub fn set_status(&mut self, status: Option<ArticleStatus>) {
        let criteria = FilterCriteria::new(self.filter.search_term.clone(), status);
        self.set_filter(criteria);
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

    fn apply(&mut self, response: PageResponse) {
        if self.options.ordering == ResponseOrdering::LatestIssued && response.seq != self.issued {
            warn!(
                "⏭️ Dropping page {} response (request #{} superseded by #{})",
                response.page, response.seq, self.issued
            );
            return;
        }

        match response.result {
            Ok(page) => {
                info!(
                    "✨ Loaded page {} of {} ({} articles)",
                    page.page,
                    page.total_pages,
                    page.articles.len()
                );
                self.page = page.page;
                self.held = page;
                self.state = FetchState::Success(());
                self.refilter();
            }
            Err(e) => {
                error!(status = ?e.status(), "Error fetching articles (page {}): {}", response.page, e);
                self.page = self.held.page;
                self.state = FetchState::Error(LIST_ERROR.to_string());
            }
        }
    }

    fn refilter(&mut self) {
        self.visible = filter::apply(&self.held.articles, &self.filter);
    }
}
