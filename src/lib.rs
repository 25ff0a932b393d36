//! Periodically scrapes mosque websites for prayer schedules and serves
//! the latest known schedule per mosque over HTTP.
//!
//! The pipeline per mosque: render the page to visible text, clean the
//! text, prompt a model for the sixteen-field schedule, normalize and
//! parse the model's output, upsert the record keyed by mosque name.

pub mod clean;
pub mod config;
pub mod error;
pub mod model;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod scrape;
pub mod server;
pub mod store;
pub mod times;

pub use config::AppConfig;
pub use error::ScrapeError;
pub use model::{Extraction, PrayerTimes};
pub use registry::Mosque;
pub use scrape::Scraper;
pub use store::Store;
