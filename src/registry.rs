use std::sync::OnceLock;

use serde::Serialize;

/// Static descriptor for one mosque site.
///
/// `url` is the page the scraper renders; the remaining fields are display
/// metadata merged into the query response.
#[derive(Debug, Clone, Serialize)]
pub struct Mosque {
    pub name: String,
    #[serde(skip_serializing)]
    pub url: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub website: String,
}

impl Mosque {
    pub fn new(
        name: &str,
        url: &str,
        address: &str,
        latitude: f64,
        longitude: f64,
        website: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            address: address.to_string(),
            latitude,
            longitude,
            website: website.to_string(),
        }
    }
}

/// The configured mosque sites. Loaded once, read-only at runtime.
pub fn mosques() -> &'static [Mosque] {
    static MOSQUES: OnceLock<Vec<Mosque>> = OnceLock::new();
    MOSQUES.get_or_init(|| {
        vec![
            Mosque::new(
                "Baitul Aman",
                "https://www.baitulaman.org/prayer-times",
                "510 Barton St E, Hamilton, ON",
                43.2531,
                -79.8459,
                "https://www.baitulaman.org",
            ),
            Mosque::new(
                "Baitul Mukarram",
                "https://www.baitulmukarram.ca/salah",
                "1545 Main St E, Hamilton, ON",
                43.2419,
                -79.8103,
                "https://www.baitulmukarram.ca",
            ),
            Mosque::new(
                "Umar Mosque",
                "https://umarmosque.ca/prayer-timings",
                "1450 Upper Ottawa St, Hamilton, ON",
                43.2114,
                -79.8346,
                "https://umarmosque.ca",
            ),
        ]
    })
}

/// Look up a descriptor by mosque name.
pub fn find(name: &str) -> Option<&'static Mosque> {
    mosques().iter().find(|m| m.name == name)
}
