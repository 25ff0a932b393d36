mod open_ai;

pub use open_ai::OpenAiProvider;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ScrapeError;

/// Seam for the extraction model: prompt in, JSON object out, or failure.
///
/// Constructed once at startup and shared by reference into the scraper.
/// Implementations must be deterministic as far as the API allows
/// (temperature 0, JSON-only output).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Send an extraction prompt and return the parsed JSON object
    async fn extract(&self, prompt: &str) -> Result<Value, ScrapeError>;
}
