pub mod api;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod types;

pub use api::ArticleApi;
pub use error::{Error, Result};
pub use fetch::FetchState;
pub use types::{Article, ArticlePage, ArticleStatus, FilterCriteria, PAGE_SIZE};
