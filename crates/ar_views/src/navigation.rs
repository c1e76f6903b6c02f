use ar_core::{Error, Result};
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` or `/?page=N`
    List { page: u32 },
    /// `/article/{id}`, with the id percent-encoded in the path
    Detail { id: String },
}

impl Route {
    pub fn parse(path: &str) -> Result<Route> {
        let trimmed = path.trim();
        let (path_part, query) = trimmed.split_once('?').unwrap_or((trimmed, ""));
        if !path_part.is_empty() && !path_part.starts_with('/') {
            return Err(Error::UnknownRoute(path.to_string()));
        }
        let segments: Vec<&str> = path_part.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => {
                let mut page = 1;
                for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                    if key == "page" {
                        page = value
                            .parse::<u32>()
                            .map_err(|_| Error::UnknownRoute(path.to_string()))?;
                    }
                }
                if page == 0 {
                    return Err(Error::InvalidPage(page));
                }
                Ok(Route::List { page })
            }
            ["article", id] => {
                let id = urlencoding::decode(id).map_err(|_| Error::UnknownRoute(path.to_string()))?;
                Ok(Route::Detail { id: id.into_owned() })
            }
            _ => Err(Error::UnknownRoute(path.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List { page: 1 } => "/".to_string(),
            Route::List { page } => format!("/?page={}", page),
            Route::Detail { id } => format!("/article/{}", urlencoding::encode(id)),
        }
    }

    /// Route parameters by name: `page` for the list, `id` for the detail view.
    pub fn param(&self, name: &str) -> Option<String> {
        match (self, name) {
            (Route::List { page }, "page") => Some(page.to_string()),
            (Route::Detail { id }, "id") => Some(id.clone()),
            _ => None,
        }
    }
}

/// Navigation capability handed to the view shell.
pub trait Navigator {
    fn current(&self) -> &Route;

    /// Push `path` as the new current route.
    fn navigate(&mut self, path: &str) -> Result<()>;

    /// Swap the current route for `path` without adding a history entry.
    fn replace(&mut self, path: &str) -> Result<()>;

    /// Return to the previous route. False when there is none.
    fn back(&mut self) -> bool;

    fn param(&self, name: &str) -> Option<String> {
        self.current().param(name)
    }
}

/// In-memory history stack; the last entry is the current route.
#[derive(Debug, Clone)]
pub struct HistoryNavigator {
    entries: Vec<Route>,
}

impl HistoryNavigator {
    pub fn new(initial: &str) -> Result<Self> {
        Ok(Self {
            entries: vec![Route::parse(initial)?],
        })
    }

    pub fn history(&self) -> &[Route] {
        &self.entries
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self {
            entries: vec![Route::List { page: 1 }],
        }
    }
}

impl Navigator for HistoryNavigator {
    fn current(&self) -> &Route {
        // never empty: created with one entry and `back` keeps the first
        &self.entries[self.entries.len() - 1]
    }

    fn navigate(&mut self, path: &str) -> Result<()> {
        let route = Route::parse(path)?;
        self.entries.push(route);
        Ok(())
    }

    fn replace(&mut self, path: &str) -> Result<()> {
        let route = Route::parse(path)?;
        let last = self.entries.len() - 1;
        self.entries[last] = route;
        Ok(())
    }

    fn back(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            true
        } else {
            false
        }
    }
}
