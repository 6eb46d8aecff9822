use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use reqwest::StatusCode;
use url::Url;

use crate::config::{endpoint, Config, COUNTRIES_ENDPOINT, LEADERS_ENDPOINT};
use crate::cookies::{self, CookieJar};
use crate::error::Result;
use crate::leader::Leader;

// 403 means the cookie expired
#[derive(Debug, Clone, PartialEq)]
pub enum LeadersResponse {
    Forbidden,
    Leaders(Vec<Leader>),
}

pub trait LeaderSource {
    fn acquire_cookies(&self) -> Result<CookieJar>;
    fn countries(&self, cookies: &CookieJar) -> Result<Vec<String>>;
    fn leaders(&self, country: &str, cookies: &CookieJar) -> Result<LeadersResponse>;
}

pub trait PageFetcher {
    fn fetch_page(&self, url: &str) -> Result<String>;
}

pub struct LeadersApi {
    client: Client,
    root: Url,
}

impl LeadersApi {
    pub fn new(config: &Config) -> Result<Self> {
        // no default 30s timeout here: a slow API is waited for, not abandoned
        let client = Client::builder()
            .timeout(config.api_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(LeadersApi {
            client,
            root: config.root_url.clone(),
        })
    }

    fn with_cookies(&self, req: RequestBuilder, cookies: &CookieJar) -> RequestBuilder {
        if cookies.is_empty() {
            req
        } else {
            req.header(COOKIE, cookies.header_value())
        }
    }
}

impl LeaderSource for LeadersApi {
    fn acquire_cookies(&self) -> Result<CookieJar> {
        cookies::acquire_cookies(&self.client, &self.root)
    }

    fn countries(&self, cookies: &CookieJar) -> Result<Vec<String>> {
        let url = endpoint(&self.root, COUNTRIES_ENDPOINT)?;
        let resp = self
            .with_cookies(self.client.get(url), cookies)
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    fn leaders(&self, country: &str, cookies: &CookieJar) -> Result<LeadersResponse> {
        let url = endpoint(&self.root, LEADERS_ENDPOINT)?;
        let resp = self
            .with_cookies(self.client.get(url).query(&[("country", country)]), cookies)
            .send()?;

        if resp.status() == StatusCode::FORBIDDEN {
            return Ok(LeadersResponse::Forbidden);
        }
        let leaders: Vec<Leader> = resp.error_for_status()?.json()?;
        debug!("{} leader(s) for {}", leaders.len(), country);
        Ok(LeadersResponse::Leaders(leaders))
    }
}

pub fn build_session(config: &Config) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    let client = Client::builder()
        .timeout(config.page_timeout)
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .cookie_store(true)
        .build()?;
    Ok(client)
}

impl PageFetcher for Client {
    fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = self.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            warn!("{} answered {}", url, status);
        }
        Ok(resp.text()?)
    }
}
