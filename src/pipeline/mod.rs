//! Pipeline entry points for scraper operations.

pub mod scrape;

pub use scrape::run_scraper;
