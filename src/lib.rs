pub mod config;
pub mod error;
pub mod logger;
pub mod leader;
pub mod cookies;
pub mod api;
pub mod extractor;
pub mod scraper;
pub mod store;

// Exporting types for convenience
pub use api::{LeaderSource, LeadersApi, LeadersResponse, PageFetcher};
pub use config::Config;
pub use cookies::CookieJar;
pub use error::{Error, Result};
pub use extractor::{BioExtractor, BIO_NOT_AVAILABLE, NO_PARAGRAPH};
pub use leader::{Leader, LeadersByCountry};
pub use self::scraper::Scraper;
pub use store::LeaderStore;
