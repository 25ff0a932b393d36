use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use log::error;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::registry;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

/// Create the router for the query API.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/prayer-times", get(prayer_times))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Latest schedule per mosque, merged with its registry descriptor.
///
/// Only mosques present in both the registry and the store appear;
/// unmatched entries on either side are silently omitted. The response
/// never reflects in-flight scrape failures, only committed records.
async fn prayer_times(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let records = state.store.all().map_err(|err| {
        error!("failed to read prayer times: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut result = Vec::new();
    for record in records {
        let Some(mosque) = registry::find(&record.mosque_name) else {
            continue;
        };

        let mut entry = serde_json::to_value(mosque).map_err(internal_error)?;
        entry["prayer_times"] = serde_json::to_value(&record).map_err(internal_error)?;
        result.push(entry);
    }

    Ok(Json(result))
}

fn internal_error(err: serde_json::Error) -> StatusCode {
    error!("failed to serialize response: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Extraction, PrayerTimes};
    use chrono::{NaiveDate, Utc};

    fn record(name: &str) -> PrayerTimes {
        let extraction = Extraction {
            fajr_iqamah: Some("5:30 AM".to_string()),
            ..Default::default()
        };
        PrayerTimes::from_extraction(
            name,
            &extraction,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_merges_registry_and_records() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        store.upsert(&record("Baitul Aman")).unwrap();
        // Present in the store but not the registry: omitted
        store.upsert(&record("Closed Mosque")).unwrap();

        let state = AppState {
            store: store.clone(),
        };
        let Json(body) = prayer_times(State(state)).await.unwrap();

        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["name"], "Baitul Aman");
        assert_eq!(body[0]["website"], "https://www.baitulaman.org");
        assert_eq!(body[0]["prayer_times"]["fajr_iqamah"], "05:30:00");
        assert_eq!(body[0]["prayer_times"]["date"], "2025-06-01");
    }

    #[tokio::test]
    async fn test_registry_only_mosques_are_omitted() {
        // Registry has several mosques; none have records yet
        let store = Arc::new(Store::open_in_memory().unwrap());
        let state = AppState { store };
        let Json(body) = prayer_times(State(state)).await.unwrap();
        assert!(body.is_empty());
    }
}
