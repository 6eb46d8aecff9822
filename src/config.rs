use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_ROOT_URL: &str = "https://country-leaders.onrender.com";
pub const DEFAULT_OUTPUT_PATH: &str = "Data/leaders.json";
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("leaders_scraper/", env!("CARGO_PKG_VERSION"));

pub const COOKIE_ENDPOINT: &str = "cookie";
pub const COUNTRIES_ENDPOINT: &str = "countries";
pub const LEADERS_ENDPOINT: &str = "leaders";

#[derive(Debug, Clone)]
pub struct Config {
    pub root_url: Url,
    pub output_path: PathBuf,
    // None waits as long as the API takes (cold starts can be slow)
    pub api_timeout: Option<Duration>,
    pub page_timeout: Duration,
    pub user_agent: String,
}

impl Config {
    pub fn new<P: AsRef<Path>>(root_url: &str, output_path: P) -> Result<Self> {
        let root_url = Url::parse(root_url)?;
        if root_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(root_url.to_string()));
        }
        Ok(Config {
            root_url,
            output_path: output_path.as_ref().to_path_buf(),
            api_timeout: None,
            page_timeout: Duration::from_secs(DEFAULT_PAGE_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn from_defaults() -> Result<Self> {
        Self::new(DEFAULT_ROOT_URL, DEFAULT_OUTPUT_PATH)
    }
}

// trailing slash on `base` is ignored
pub fn endpoint(base: &Url, name: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push(name);
    Ok(url)
}
