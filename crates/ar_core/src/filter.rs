use crate::types::{Article, ArticleStatus, FilterCriteria};

/// Case-insensitive substring match on the title. An empty term matches everything.
pub fn matches_search(article: &Article, search_term: &str) -> bool {
    search_term.is_empty() || article.title.to_lowercase().contains(&search_term.to_lowercase())
}

pub fn matches_status(article: &Article, status: Option<ArticleStatus>) -> bool {
    status.map_or(true, |status| article.status == status)
}

pub fn matches(article: &Article, criteria: &FilterCriteria) -> bool {
    matches_search(article, &criteria.search_term) && matches_status(article, criteria.status)
}

/// Narrow a held page to the articles matching `criteria`, preserving order.
pub fn apply(articles: &[Article], criteria: &FilterCriteria) -> Vec<Article> {
    articles
        .iter()
        .filter(|article| matches(article, criteria))
        .cloned()
        .collect()
}
