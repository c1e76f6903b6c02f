use std::sync::Arc;

use ar_core::{ArticleApi, FilterCriteria, Result};
use tracing::info;

use crate::detail::DetailController;
use crate::list::ListController;
use crate::navigation::{Navigator, Route};
use crate::options::ViewOptions;

pub enum ActiveView {
    List(ListController),
    Detail(DetailController),
}

/// Route table: keeps exactly one controller alive for the navigator's
/// current route and tears it down when the route changes view.
pub struct ViewShell<N: Navigator> {
    api: Arc<dyn ArticleApi>,
    options: ViewOptions,
    navigator: N,
    view: Option<ActiveView>,
}

impl<N: Navigator> ViewShell<N> {
    pub fn new(api: Arc<dyn ArticleApi>, options: ViewOptions, navigator: N) -> Self {
        Self {
            api,
            options,
            navigator,
            view: None,
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn view(&self) -> Option<&ActiveView> {
        self.view.as_ref()
    }

    pub fn list(&self) -> Option<&ListController> {
        match &self.view {
            Some(ActiveView::List(list)) => Some(list),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&DetailController> {
        match &self.view {
            Some(ActiveView::Detail(detail)) => Some(detail),
            _ => None,
        }
    }

    /// Requests of the active view that have not resolved yet.
    pub fn in_flight(&self) -> usize {
        match &self.view {
            Some(ActiveView::List(list)) => list.in_flight(),
            Some(ActiveView::Detail(detail)) => detail.in_flight(),
            None => 0,
        }
    }

    /// Bring the active controller in line with the current route.
    pub fn sync(&mut self) -> Result<()> {
        let route = self.navigator.current().clone();
        match (&mut self.view, &route) {
            (Some(ActiveView::List(list)), Route::List { page }) => {
                if list.page() != *page {
                    list.set_page(*page)?;
                }
                return Ok(());
            }
            (Some(ActiveView::Detail(detail)), Route::Detail { id }) => {
                if detail.id() != Some(id.as_str()) {
                    detail.load(id);
                }
                return Ok(());
            }
            _ => {}
        }
        self.view = Some(self.instantiate(route)?);
        Ok(())
    }

    fn instantiate(&self, route: Route) -> Result<ActiveView> {
        match route {
            Route::List { page } => {
                info!("📰 Opening article list at page {}", page);
                let mut list = ListController::new(Arc::clone(&self.api), self.options);
                list.set_page(page)?;
                Ok(ActiveView::List(list))
            }
            Route::Detail { id } => {
                info!("📖 Opening article {}", id);
                let mut detail = DetailController::new(Arc::clone(&self.api));
                detail.load(&id);
                Ok(ActiveView::Detail(detail))
            }
        }
    }

    pub fn open_article(&mut self, id: &str) -> Result<()> {
        self.navigator.navigate(&Route::Detail { id: id.to_string() }.path())?;
        self.sync()
    }

    pub fn back_to_list(&mut self) -> Result<()> {
        self.navigator.navigate(&Route::List { page: 1 }.path())?;
        self.sync()
    }

    /// Follow the navigator's history. False when there is nothing to go back to.
    pub fn back(&mut self) -> Result<bool> {
        if !self.navigator.back() {
            return Ok(false);
        }
        self.sync()?;
        Ok(true)
    }

    /// `back`, falling through to the first list page when history is
    /// exhausted. False when already there.
    pub fn back_or_list(&mut self) -> Result<bool> {
        if self.back()? {
            return Ok(true);
        }
        if self.list().map_or(false, |list| list.page() == 1) {
            return Ok(false);
        }
        self.back_to_list()?;
        Ok(true)
    }

    pub fn set_page(&mut self, page: u32) -> Result<()> {
        let path = Route::List { page }.path();
        if let Some(ActiveView::List(list)) = &mut self.view {
            list.set_page(page)?;
            return self.navigator.replace(&path);
        }
        self.navigator.navigate(&path)?;
        self.sync()
    }

    pub fn next_page(&mut self) -> Result<bool> {
        let Some(ActiveView::List(list)) = &mut self.view else {
            return Ok(false);
        };
        if !list.next_page()? {
            return Ok(false);
        }
        let path = Route::List { page: list.page() }.path();
        self.navigator.replace(&path)?;
        Ok(true)
    }

    pub fn prev_page(&mut self) -> Result<bool> {
        let Some(ActiveView::List(list)) = &mut self.view else {
            return Ok(false);
        };
        if !list.prev_page()? {
            return Ok(false);
        }
        let path = Route::List { page: list.page() }.path();
        self.navigator.replace(&path)?;
        Ok(true)
    }

    /// Returns false when the list is not the active view.
    pub fn set_filter(&mut self, criteria: FilterCriteria) -> bool {
        match &mut self.view {
            Some(ActiveView::List(list)) => {
                list.set_filter(criteria);
                true
            }
            _ => false,
        }
    }

    /// Re-issue the active view's request, e.g. after a failed fetch.
    pub fn reload(&mut self) -> Result<()> {
        match &mut self.view {
            Some(ActiveView::List(list)) => {
                let page = list.page();
                return list.set_page(page);
            }
            Some(ActiveView::Detail(detail)) => {
                if let Some(id) = detail.id().map(str::to_string) {
                    detail.load(&id);
                }
                return Ok(());
            }
            None => {}
        }
        self.sync()
    }

    pub async fn settle(&mut self) -> Result<bool> {
        let settled = match &mut self.view {
            Some(ActiveView::List(list)) => {
                let settled = list.settle().await;
                // a late response can move the list to another page
                let page = list.page();
                if settled && self.navigator.current() != &(Route::List { page }) {
                    self.navigator.replace(&Route::List { page }.path())?;
                }
                settled
            }
            Some(ActiveView::Detail(detail)) => detail.settle().await,
            None => false,
        };
        Ok(settled)
    }

    pub async fn settle_all(&mut self) -> Result<()> {
        while self.settle().await? {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;
    use crate::testing::{article, numbered_page, ScriptedApi};
    use ar_core::{ArticleStatus, FetchState};

    fn api() -> Arc<ScriptedApi> {
        Arc::new(
            ScriptedApi::default()
                .with_page(numbered_page(1, 3, 6))
                .with_page(numbered_page(2, 3, 6))
                .with_page(numbered_page(3, 3, 1))
                .with_article(article("p1-0", "Page 1 article 0", ArticleStatus::Original))
                .with_article(article("p1-1", "Page 1 article 1", ArticleStatus::AiUpdated)),
        )
    }

    fn shell(api: &Arc<ScriptedApi>, start: &str) -> ViewShell<HistoryNavigator> {
        let nav = HistoryNavigator::new(start).unwrap();
        ViewShell::new(api.clone(), ViewOptions::default(), nav)
    }

    #[tokio::test]
    async fn test_root_route_opens_list() {
        let api = api();
        let mut shell = shell(&api, "/");
        shell.sync().unwrap();
        shell.settle_all().await.unwrap();

        let list = shell.list().unwrap();
        assert_eq!(list.page(), 1);
        assert_eq!(list.total_pages(), 3);
        assert_eq!(list.visible().len(), 6);
        assert!(shell.detail().is_none());
    }

    #[tokio::test]
    async fn test_list_page_comes_from_route() {
        let api = api();
        let mut shell = shell(&api, "/?page=2");
        shell.sync().unwrap();
        shell.settle_all().await.unwrap();
        assert_eq!(shell.list().unwrap().visible()[0].id, "p2-0");
    }

    #[tokio::test]
    async fn test_detail_route_loads_article() {
        let api = api();
        let mut shell = shell(&api, "/article/p1-1");
        shell.sync().unwrap();
        shell.settle_all().await.unwrap();
        let detail = shell.detail().unwrap();
        assert_eq!(detail.article().unwrap().title, "Page 1 article 1");
    }

    #[tokio::test]
    async fn test_open_article_and_back() {
        let api = api();
        let mut shell = shell(&api, "/");
        shell.sync().unwrap();
        shell.settle_all().await.unwrap();
        assert!(shell.next_page().unwrap());
        shell.settle_all().await.unwrap();
        assert_eq!(shell.navigator().current(), &Route::List { page: 2 });

        shell.open_article("p1-0").unwrap();
        shell.settle_all().await.unwrap();
        assert_eq!(shell.navigator().param("id").as_deref(), Some("p1-0"));
        assert_eq!(shell.detail().unwrap().article().unwrap().id, "p1-0");

        assert!(shell.back().unwrap());
        shell.settle_all().await.unwrap();
        let list = shell.list().unwrap();
        assert_eq!(list.page(), 2);
        assert_eq!(list.visible()[0].id, "p2-0");
        assert!(!shell.back().unwrap());
    }

    #[tokio::test]
    async fn test_open_article_with_reserved_characters() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_article(article("a", "Wrong", ArticleStatus::Original))
                .with_article(article("a?b", "Right", ArticleStatus::Original)),
        );
        let mut shell = shell(&api, "/");
        shell.open_article("a?b").unwrap();
        shell.settle_all().await.unwrap();

        assert_eq!(shell.navigator().current(), &Route::Detail { id: "a?b".to_string() });
        assert_eq!(shell.detail().unwrap().article().unwrap().title, "Right");
        assert_eq!(api.calls(), vec!["article:a?b"]);
    }

    #[tokio::test]
    async fn test_back_or_list_stops_at_first_page() {
        let api = api();
        let mut shell = shell(&api, "/");
        shell.sync().unwrap();
        shell.settle_all().await.unwrap();

        assert!(!shell.back_or_list().unwrap());
        assert!(!shell.back_or_list().unwrap());
        assert_eq!(shell.navigator().history(), &[Route::List { page: 1 }]);
        assert_eq!(shell.list().unwrap().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_back_or_list_leaves_detail_without_history() {
        let api = api();
        let mut shell = shell(&api, "/article/p1-0");
        shell.sync().unwrap();

        assert!(shell.back_or_list().unwrap());
        shell.settle_all().await.unwrap();
        assert_eq!(shell.list().unwrap().page(), 1);
        assert_eq!(
            shell.navigator().history(),
            &[Route::Detail { id: "p1-0".to_string() }, Route::List { page: 1 }]
        );
    }

    #[tokio::test]
    async fn test_changing_detail_id_reloads() {
        let api = api();
        let mut shell = shell(&api, "/article/p1-0");
        shell.sync().unwrap();
        shell.settle_all().await.unwrap();

        shell.open_article("p1-1").unwrap();
        assert!(shell.detail().unwrap().article().is_none());
        shell.settle_all().await.unwrap();
        assert_eq!(shell.detail().unwrap().article().unwrap().id, "p1-1");

        // same id: nothing new is fetched
        shell.sync().unwrap();
        assert_eq!(shell.detail().unwrap().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_page_changes_replace_history_entry() {
        let api = api();
        let mut shell = shell(&api, "/");
        shell.sync().unwrap();
        shell.settle_all().await.unwrap();

        shell.set_page(3).unwrap();
        shell.settle_all().await.unwrap();
        assert!(!shell.next_page().unwrap());
        assert!(shell.prev_page().unwrap());
        shell.settle_all().await.unwrap();

        assert_eq!(shell.navigator().history(), &[Route::List { page: 2 }]);
    }

    #[tokio::test]
    async fn test_filter_only_applies_to_list() {
        let api = api();
        let mut shell = shell(&api, "/article/p1-0");
        shell.sync().unwrap();
        assert!(!shell.set_filter(FilterCriteria::new("x", None)));

        shell.back_to_list().unwrap();
        shell.settle_all().await.unwrap();
        assert!(shell.set_filter(FilterCriteria::new("", Some(ArticleStatus::AiUpdated))));
        assert!(shell.list().unwrap().visible().is_empty());
    }

    #[tokio::test]
    async fn test_reload_after_failure() {
        let api = api();
        let mut shell = shell(&api, "/article/unknown");
        shell.sync().unwrap();
        shell.settle_all().await.unwrap();
        assert!(matches!(shell.detail().unwrap().state(), FetchState::Error(_)));

        shell.reload().unwrap();
        assert!(shell.detail().unwrap().state().is_loading());
        shell.settle_all().await.unwrap();
        assert_eq!(api.calls().iter().filter(|c| *c == "article:unknown").count(), 2);
    }

    #[tokio::test]
    async fn test_late_page_response_moves_route() {
        let api = api();
        let release_first = api.hold("page:1");
        let mut shell = shell(&api, "/");
        shell.sync().unwrap();
        shell.set_page(2).unwrap();
        assert_eq!(shell.navigator().current(), &Route::List { page: 2 });

        shell.settle().await.unwrap();
        release_first.send(()).unwrap();
        shell.settle_all().await.unwrap();

        assert_eq!(shell.list().unwrap().page(), 1);
        assert_eq!(shell.navigator().current(), &Route::List { page: 1 });
    }
}
