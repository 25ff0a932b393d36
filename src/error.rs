use thiserror::Error;

/// Errors that can occur while scraping and serving prayer times
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Failed to fetch or render the page
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The external render service rejected the request
    #[error("Render service error: {0}")]
    RenderError(String),

    /// The model call failed or returned an unusable response
    #[error("Extraction failed: {0}")]
    ExtractionError(String),

    /// The model returned text that is not a JSON object
    #[error("Malformed model response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// A render or extraction step exceeded its deadline
    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    /// Database error from the record store
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
