pub mod cleaner;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod scraper;
