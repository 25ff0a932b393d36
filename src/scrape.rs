use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use log::{error, info, warn};
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::clean::clean_text;
use crate::error::ScrapeError;
use crate::model::{Extraction, PrayerTimes};
use crate::prompt::build_extraction_prompt;
use crate::providers::LlmProvider;
use crate::registry::Mosque;
use crate::render::PageRenderer;
use crate::store::Store;

/// Drives the extraction pipeline across all configured mosques.
///
/// For each mosque: render the page, clean the text, prompt the model,
/// normalize and parse the result, upsert the record. Mosques are
/// independent; a failure at any step aborts only that mosque's update
/// for the run and the previous record stays in place.
#[derive(Clone)]
pub struct Scraper {
    renderer: Arc<PageRenderer>,
    provider: Arc<dyn LlmProvider>,
    store: Arc<Store>,
    step_timeout: Duration,
}

impl Scraper {
    pub fn new(
        renderer: PageRenderer,
        provider: Arc<dyn LlmProvider>,
        store: Arc<Store>,
        step_timeout: Duration,
    ) -> Self {
        Self {
            renderer: Arc::new(renderer),
            provider,
            store,
            step_timeout,
        }
    }

    /// Run one full scrape pass over the given mosques, concurrently.
    ///
    /// Always completes: per-mosque failures are logged and swallowed so
    /// one broken site never blocks or aborts the others.
    pub async fn run(&self, mosques: &[Mosque]) {
        info!("starting scrape run for {} mosques", mosques.len());
        let mut tasks = JoinSet::new();

        for mosque in mosques {
            let scraper = self.clone();
            let mosque = mosque.clone();
            tasks.spawn(async move {
                let name = mosque.name.clone();
                (name, scraper.scrape_one(&mosque).await)
            });
        }

        let mut updated = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(record))) => {
                    updated += 1;
                    info!(
                        "updated {} ({} of 16 time fields populated)",
                        name,
                        record.populated_fields()
                    );
                }
                Ok((name, Err(err))) => {
                    warn!("skipping {}: {}", name, err);
                }
                Err(err) => {
                    error!("scrape task panicked: {}", err);
                }
            }
        }

        info!("scrape run finished, {} mosques updated", updated);
    }

    /// The full pipeline for one mosque. The render and model calls are
    /// the long-latency steps and each runs under its own deadline.
    async fn scrape_one(&self, mosque: &Mosque) -> Result<PrayerTimes, ScrapeError> {
        let raw = timeout(self.step_timeout, self.renderer.render(&mosque.url))
            .await
            .map_err(|_| ScrapeError::Timeout(self.step_timeout.as_secs()))??;

        let cleaned = clean_text(&raw);
        let prompt = build_extraction_prompt(&cleaned);

        let value = timeout(self.step_timeout, self.provider.extract(&prompt))
            .await
            .map_err(|_| ScrapeError::Timeout(self.step_timeout.as_secs()))??;

        let extraction = Extraction::from_value(&value)?.normalized();
        let record = PrayerTimes::from_extraction(
            &mosque.name,
            &extraction,
            Local::now().date_naive(),
            Utc::now(),
        );

        self.store.upsert(&record)?;
        Ok(record)
    }
}
