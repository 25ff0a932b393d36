use std::sync::Arc;
use std::time::Duration;

use log::info;

use masjid_times::config::AppConfig;
use masjid_times::providers::{LlmProvider, OpenAiProvider};
use masjid_times::render::PageRenderer;
use masjid_times::scrape::Scraper;
use masjid_times::server::{self, AppState};
use masjid_times::scheduler;
use masjid_times::store::Store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::load()?;
    let step_timeout = Duration::from_secs(config.timeout_secs);

    let store = Arc::new(Store::open(&config.database_path)?);
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::new(&config.provider)?);
    let renderer = PageRenderer::new(step_timeout, config.renderer_url.clone());

    let scraper = Scraper::new(renderer, provider, store.clone(), step_timeout);
    scheduler::spawn(
        scraper,
        Duration::from_secs(config.scrape_interval_secs),
    );

    let app = server::create_router(AppState { store });
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("serving prayer times on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
