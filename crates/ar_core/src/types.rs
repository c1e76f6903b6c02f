use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of articles requested per page.
pub const PAGE_SIZE: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Original,
    AiUpdated,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Original => "original",
            ArticleStatus::AiUpdated => "ai_updated",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(ArticleStatus::Original),
            "ai_updated" => Ok(ArticleStatus::AiUpdated),
            other => Err(format!("Unknown article status: {} (expected original or ai_updated)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub status: ArticleStatus,
    #[serde(with = "published_date")]
    pub published_date: NaiveDate,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Article {
    /// Reference URLs in server order; empty when the server sent none.
    pub fn references(&self) -> &[String] {
        self.references.as_deref().unwrap_or(&[])
    }
}

/// One server-paginated batch of articles.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub page: u32,
    pub total_pages: u32,
}

impl Default for ArticlePage {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            page: 1,
            total_pages: 1,
        }
    }
}

/// Client-side narrowing of the held page. An empty search term and a `None`
/// status impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub status: Option<ArticleStatus>,
}

impl FilterCriteria {
    pub fn new(search_term: impl Into<String>, status: Option<ArticleStatus>) -> Self {
        Self {
            search_term: search_term.into(),
            status,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.status.is_none()
    }
}

/// Accepts the date shapes the articles backend has been seen to emit.
pub fn parse_published_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

mod published_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_published_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised published_date: {}", raw)))
    }
}
