use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned {status} for {url}")]
    Server { status: u16, url: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True for the failures a fetch can end in: transport, non-2xx status or a
    /// body that does not match the article schemas.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Server { .. } | Error::MalformedResponse(_) | Error::Http(_)
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
