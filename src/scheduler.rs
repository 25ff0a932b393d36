use std::time::Duration;

use log::info;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::registry;
use crate::scrape::Scraper;

/// Spawn the fixed-interval scrape loop.
///
/// The first run starts immediately. Runs never overlap: each run is
/// awaited before the next tick is taken, and ticks that come due while a
/// run is still in flight are skipped rather than queued, so a slow run
/// costs at most one interval of staleness instead of piling up work.
pub fn spawn(scraper: Scraper, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("scheduling scrape runs every {} seconds", every.as_secs());

        loop {
            ticker.tick().await;
            scraper.run(registry::mosques()).await;
        }
    })
}
