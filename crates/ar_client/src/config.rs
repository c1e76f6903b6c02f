use ar_core::{Error, Result, PAGE_SIZE};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const API_URL_ENV: &str = "ARTICLES_API_URL";
pub const PAGE_SIZE_ENV: &str = "ARTICLES_PAGE_SIZE";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub page_size: u32,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            page_size: PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Reads `ARTICLES_API_URL` and `ARTICLES_PAGE_SIZE`, falling back to the
    /// local development backend and the default page size.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let config = Self::new(&url)?;
        match lookup(PAGE_SIZE_ENV) {
            Some(raw) => {
                let size = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| Error::Config(format!("{}={}: {}", PAGE_SIZE_ENV, raw, e)))?;
                config.with_page_size(size)
            }
            None => Ok(config),
        }
    }

    pub fn with_url(mut self, url: &str) -> Result<Self> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }

    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::Config("page size must be at least 1".to_string()));
        }
        self.page_size = page_size;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Endpoint paths are joined onto the base, so it must end with a slash or
// `Url::join` drops its last segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!("{}: expected an http or https URL", raw)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    Ok(url)
}
