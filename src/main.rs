use leaders_scraper_lib::{logger, Config, LeaderStore, Scraper};

use std::error::Error;
use log::info;

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    info!("Starting leaders scraper...");

    let config = Config::from_defaults()?;
    info!("API root: {} | output: {}", config.root_url, config.output_path.display());

    // 1. Collect leaders and their bios
    let scraper = Scraper::new(&config)?;
    let leaders = scraper.collect()?;

    // 2. Persist, then read back to make sure the file holds what we collected
    let store = LeaderStore::new(&config.output_path);
    store.save(&leaders)?;
    store.check(&leaders)?;

    info!("Scraping Completed. Results in {}", store.path().display());
    Ok(())
}
