use log::{info, warn};
use reqwest::blocking::Client;

use crate::api::{self, LeaderSource, LeadersApi, LeadersResponse, PageFetcher};
use crate::config::Config;
use crate::cookies::CookieJar;
use crate::error::{Error, Result};
use crate::extractor::{BioExtractor, BIO_NOT_AVAILABLE};
use crate::leader::{Leader, LeadersByCountry, PAGE_URL_FIELD};

pub struct Scraper<S, P> {
    source: S,
    pages: P,
    extractor: BioExtractor,
}

impl Scraper<LeadersApi, Client> {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Scraper::with_parts(LeadersApi::new(config)?, api::build_session(config)?))
    }
}

impl<S: LeaderSource, P: PageFetcher> Scraper<S, P> {
    pub fn with_parts(source: S, pages: P) -> Self {
        Scraper {
            source,
            pages,
            extractor: BioExtractor::new(),
        }
    }

    pub fn collect(&self) -> Result<LeadersByCountry> {
        let mut cookies = self.source.acquire_cookies()?;
        let countries = self.source.countries(&cookies)?;
        info!("Found {} countries: {}", countries.len(), countries.join(", "));

        let mut result = LeadersByCountry::new();
        for country in countries {
            let leaders = self.fetch_leaders(&country, &mut cookies)?;
            info!("Processing {} leader(s) for {}", leaders.len(), country);

            let leaders = leaders.into_iter().map(|l| self.enrich(l)).collect();
            result.insert(country, leaders);
        }

        info!("Collected {} leaders across {} countries.", result.leader_count(), result.len());
        Ok(result)
    }

    // No retry cap: loops for as long as the API answers 403.
    fn fetch_leaders(&self, country: &str, cookies: &mut CookieJar) -> Result<Vec<Leader>> {
        loop {
            match self.source.leaders(country, cookies)? {
                LeadersResponse::Leaders(leaders) => return Ok(leaders),
                LeadersResponse::Forbidden => {
                    warn!("Cookie rejected while fetching leaders for {}. Refreshing...", country);
                    *cookies = self.source.acquire_cookies()?;
                }
            }
        }
    }

    fn enrich(&self, leader: Leader) -> Leader {
        if !leader.has_page_url() {
            return leader;
        }

        let bio = match self.fetch_bio(&leader) {
            Ok(bio) => bio,
            Err(e) => {
                warn!("Failed to fetch paragraph for {}: {}", leader_label(&leader), e);
                BIO_NOT_AVAILABLE.to_string()
            }
        };
        leader.with_bio(bio)
    }

    fn fetch_bio(&self, leader: &Leader) -> Result<String> {
        let url = leader.page_url().ok_or_else(|| Error::InvalidPageUrl(leader_label(leader)))?;
        self.extractor.extract_bio(url, &self.pages)
    }
}

fn leader_label(leader: &Leader) -> String {
    leader
        .get(PAGE_URL_FIELD)
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .unwrap_or_default()
}
