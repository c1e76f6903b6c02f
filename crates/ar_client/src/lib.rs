pub mod config;
pub mod http;
mod wire;

pub use config::ClientConfig;
pub use http::HttpArticleApi;

pub mod prelude {
    pub use super::{ClientConfig, HttpArticleApi};
    pub use ar_core::{Article, ArticleApi, ArticlePage, Error, Result};
}
