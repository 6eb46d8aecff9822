use log::debug;
use reqwest::blocking::Client;
use url::Url;

use crate::config::{endpoint, COOKIE_ENDPOINT};
use crate::error::Result;

// No expiry is tracked: a jar is good until a request made with it comes back 403.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    pairs: Vec<(String, String)>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        CookieJar {
            pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    // `user_cookie=abc; other=1`
    pub fn header_value(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn acquire_cookies(client: &Client, base_url: &Url) -> Result<CookieJar> {
    let url = endpoint(base_url, COOKIE_ENDPOINT)?;
    let resp = client.get(url).send()?;

    let jar = CookieJar::from_pairs(
        resp.cookies().map(|c| (c.name().to_string(), c.value().to_string())),
    );
    debug!("Received {} cookie(s) from {} ({})", jar.pairs.len(), base_url, resp.status());
    Ok(jar)
}
