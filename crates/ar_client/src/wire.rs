use ar_core::{Article, ArticlePage, Error, Result};
use serde::Deserialize;

#[derive(Deserialize)]
struct ListEnvelope {
    data: ListData,
}

#[derive(Deserialize)]
struct ListData {
    articles: Vec<Article>,
    pagination: Pagination,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    total_pages: u32,
}

/// Decode `{ data: { articles, pagination: { totalPages } } }` for the page
/// that was requested.
pub(crate) fn decode_page(body: &[u8], page: u32) -> Result<ArticlePage> {
    let envelope: ListEnvelope = serde_json::from_slice(body)
        .map_err(|e| Error::MalformedResponse(format!("article list: {}", e)))?;
    for article in &envelope.data.articles {
        validate_article(article)?;
    }
    Ok(ArticlePage {
        articles: envelope.data.articles,
        page,
        total_pages: envelope.data.pagination.total_pages,
    })
}

pub(crate) fn decode_article(body: &[u8]) -> Result<Article> {
    let article: Article = serde_json::from_slice(body)
        .map_err(|e| Error::MalformedResponse(format!("article: {}", e)))?;
    validate_article(&article)?;
    Ok(article)
}

fn validate_article(article: &Article) -> Result<()> {
    if article.id.trim().is_empty() {
        return Err(Error::MalformedResponse(format!(
            "article {:?} has an empty identifier",
            article.title
        )));
    }
    Ok(())
}
