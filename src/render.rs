use std::time::Duration;

use log::debug;
use reqwest::Client;
use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

#[derive(Serialize)]
struct RenderRequest {
    url: String,
}

#[derive(Deserialize)]
struct RenderResponse {
    content: String,
}

/// Renders a URL to the visible text of the page.
///
/// Two modes: when a render service is configured the URL is handed to it
/// and the returned content is used as-is (the service runs a real browser,
/// which JS-heavy mosque sites need). Otherwise the page is fetched
/// directly and stripped to the text of its `<body>`.
pub struct PageRenderer {
    client: Client,
    service_url: Option<String>,
}

impl PageRenderer {
    pub fn new(timeout: Duration, service_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; MasjidTimesBot/1.0)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            service_url,
        }
    }

    pub async fn render(&self, url: &str) -> Result<String, ScrapeError> {
        let text = match &self.service_url {
            Some(service) => self.render_via_service(service, url).await?,
            None => {
                let response = self.client.get(url).send().await?.error_for_status()?;
                let html = response.text().await?;
                extract_text_from_html(&html)
            }
        };

        debug!("rendered {} to {} chars of text", url, text.len());
        Ok(text)
    }

    async fn render_via_service(&self, service: &str, url: &str) -> Result<String, ScrapeError> {
        let endpoint = format!("{}/render", service.trim_end_matches('/'));
        let response = self
            .client
            .post(&endpoint)
            .json(&RenderRequest {
                url: url.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScrapeError::RenderError(format!(
                "render service returned status {}",
                response.status()
            )));
        }

        let rendered: RenderResponse = response.json().await?;
        Ok(rendered.content)
    }
}

/// Visible text of the document body, in document order.
fn extract_text_from_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = scraper::Selector::parse("body").unwrap();
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}
