use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::ScrapeError;
use crate::times::{normalize_pair, parse_time};

/// Raw model output for one site: sixteen time fields, each a verbatim
/// time string or absent. Never persisted directly; it is normalized and
/// parsed into a [`PrayerTimes`] record first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub fajr_start: Option<String>,
    pub fajr_iqamah: Option<String>,
    pub zuhr_start: Option<String>,
    pub zuhr_iqamah: Option<String>,
    pub asr_start: Option<String>,
    pub asr_iqamah: Option<String>,
    pub maghrib_start: Option<String>,
    pub maghrib_iqamah: Option<String>,
    pub isha_start: Option<String>,
    pub isha_iqamah: Option<String>,
    pub jummah1_start: Option<String>,
    pub jummah1_iqamah: Option<String>,
    pub jummah2_start: Option<String>,
    pub jummah2_iqamah: Option<String>,
    pub jummah3_start: Option<String>,
    pub jummah3_iqamah: Option<String>,
}

impl Extraction {
    /// Build an extraction from untrusted model output.
    ///
    /// The value must be a JSON object; anything else is an error. Missing
    /// fields and non-string values default to absent rather than failing,
    /// since partial output is still usable.
    pub fn from_value(value: &Value) -> Result<Self, ScrapeError> {
        if !value.is_object() {
            return Err(ScrapeError::ExtractionError(
                "model response is not a JSON object".to_string(),
            ));
        }

        let field = |name: &str| -> Option<String> {
            value.get(name).and_then(Value::as_str).map(String::from)
        };

        Ok(Self {
            fajr_start: field("fajr_start"),
            fajr_iqamah: field("fajr_iqamah"),
            zuhr_start: field("zuhr_start"),
            zuhr_iqamah: field("zuhr_iqamah"),
            asr_start: field("asr_start"),
            asr_iqamah: field("asr_iqamah"),
            maghrib_start: field("maghrib_start"),
            maghrib_iqamah: field("maghrib_iqamah"),
            isha_start: field("isha_start"),
            isha_iqamah: field("isha_iqamah"),
            jummah1_start: field("jummah1_start"),
            jummah1_iqamah: field("jummah1_iqamah"),
            jummah2_start: field("jummah2_start"),
            jummah2_iqamah: field("jummah2_iqamah"),
            jummah3_start: field("jummah3_start"),
            jummah3_iqamah: field("jummah3_iqamah"),
        })
    }

    /// Apply pair repair to the five daily prayers.
    ///
    /// Jummah slots are left untouched: their ordering and distribution are
    /// handled by the extraction prompt itself.
    pub fn normalized(mut self) -> Self {
        (self.fajr_start, self.fajr_iqamah) = normalize_pair(self.fajr_start, self.fajr_iqamah);
        (self.zuhr_start, self.zuhr_iqamah) = normalize_pair(self.zuhr_start, self.zuhr_iqamah);
        (self.asr_start, self.asr_iqamah) = normalize_pair(self.asr_start, self.asr_iqamah);
        (self.maghrib_start, self.maghrib_iqamah) =
            normalize_pair(self.maghrib_start, self.maghrib_iqamah);
        (self.isha_start, self.isha_iqamah) = normalize_pair(self.isha_start, self.isha_iqamah);
        self
    }
}

/// The persisted schedule for one mosque. One current record per mosque
/// name; each successful scrape replaces the previous record wholesale.
///
/// Serializes times as `HH:MM:SS`, the date as an ISO-8601 calendar date
/// and the timestamp as an ISO-8601 datetime, matching the query API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrayerTimes {
    pub mosque_name: String,
    pub date: NaiveDate,
    pub fajr_start: Option<NaiveTime>,
    pub fajr_iqamah: Option<NaiveTime>,
    pub zuhr_start: Option<NaiveTime>,
    pub zuhr_iqamah: Option<NaiveTime>,
    pub asr_start: Option<NaiveTime>,
    pub asr_iqamah: Option<NaiveTime>,
    pub maghrib_start: Option<NaiveTime>,
    pub maghrib_iqamah: Option<NaiveTime>,
    pub isha_start: Option<NaiveTime>,
    pub isha_iqamah: Option<NaiveTime>,
    pub jummah1_start: Option<NaiveTime>,
    pub jummah1_iqamah: Option<NaiveTime>,
    pub jummah2_start: Option<NaiveTime>,
    pub jummah2_iqamah: Option<NaiveTime>,
    pub jummah3_start: Option<NaiveTime>,
    pub jummah3_iqamah: Option<NaiveTime>,
    pub updated_at: DateTime<Utc>,
}

impl PrayerTimes {
    /// Parse every field of a normalized extraction into canonical times.
    /// Unparseable fields become None; parsing never fails the record.
    pub fn from_extraction(
        mosque_name: &str,
        extraction: &Extraction,
        date: NaiveDate,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let t = |raw: &Option<String>| parse_time(raw.as_deref());

        Self {
            mosque_name: mosque_name.to_string(),
            date,
            fajr_start: t(&extraction.fajr_start),
            fajr_iqamah: t(&extraction.fajr_iqamah),
            zuhr_start: t(&extraction.zuhr_start),
            zuhr_iqamah: t(&extraction.zuhr_iqamah),
            asr_start: t(&extraction.asr_start),
            asr_iqamah: t(&extraction.asr_iqamah),
            maghrib_start: t(&extraction.maghrib_start),
            maghrib_iqamah: t(&extraction.maghrib_iqamah),
            isha_start: t(&extraction.isha_start),
            isha_iqamah: t(&extraction.isha_iqamah),
            jummah1_start: t(&extraction.jummah1_start),
            jummah1_iqamah: t(&extraction.jummah1_iqamah),
            jummah2_start: t(&extraction.jummah2_start),
            jummah2_iqamah: t(&extraction.jummah2_iqamah),
            jummah3_start: t(&extraction.jummah3_start),
            jummah3_iqamah: t(&extraction.jummah3_iqamah),
            updated_at,
        }
    }

    /// Number of populated time fields, used to log how complete a fresh
    /// record is compared to what it overwrites.
    pub fn populated_fields(&self) -> usize {
        [
            self.fajr_start,
            self.fajr_iqamah,
            self.zuhr_start,
            self.zuhr_iqamah,
            self.asr_start,
            self.asr_iqamah,
            self.maghrib_start,
            self.maghrib_iqamah,
            self.isha_start,
            self.isha_iqamah,
            self.jummah1_start,
            self.jummah1_iqamah,
            self.jummah2_start,
            self.jummah2_iqamah,
            self.jummah3_start,
            self.jummah3_iqamah,
        ]
        .iter()
        .filter(|t| t.is_some())
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_defaults_missing_fields() {
        let value = json!({
            "fajr_start": "5:10 AM",
            "fajr_iqamah": "5:30 AM",
            "zuhr_iqamah": 1330,
            "unexpected": "ignored"
        });

        let extraction = Extraction::from_value(&value).unwrap();
        assert_eq!(extraction.fajr_start.as_deref(), Some("5:10 AM"));
        assert_eq!(extraction.fajr_iqamah.as_deref(), Some("5:30 AM"));
        // Non-string values are treated as absent, not an error
        assert_eq!(extraction.zuhr_iqamah, None);
        assert_eq!(extraction.isha_start, None);
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(Extraction::from_value(&json!([1, 2, 3])).is_err());
        assert!(Extraction::from_value(&json!("5:10 AM")).is_err());
    }

    #[test]
    fn test_normalized_swaps_reversed_daily_pair_but_not_jummah() {
        let extraction = Extraction {
            zuhr_start: Some("2:00 PM".to_string()),
            zuhr_iqamah: Some("1:00 PM".to_string()),
            jummah1_start: Some("2:30 PM".to_string()),
            jummah1_iqamah: Some("1:15 PM".to_string()),
            ..Default::default()
        };

        let normalized = extraction.normalized();
        assert_eq!(normalized.zuhr_start.as_deref(), Some("1:00 PM"));
        assert_eq!(normalized.zuhr_iqamah.as_deref(), Some("2:00 PM"));
        // Jummah is the prompt's responsibility, left as extracted
        assert_eq!(normalized.jummah1_start.as_deref(), Some("2:30 PM"));
        assert_eq!(normalized.jummah1_iqamah.as_deref(), Some("1:15 PM"));
    }

    #[test]
    fn test_record_serialization_format() {
        let extraction = Extraction {
            fajr_iqamah: Some("5:30 AM".to_string()),
            isha_iqamah: Some("10:00 PM".to_string()),
            ..Default::default()
        };
        let record = PrayerTimes::from_extraction(
            "Baitul Aman",
            &extraction,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            Utc::now(),
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["mosque_name"], "Baitul Aman");
        assert_eq!(value["date"], "2025-06-01");
        assert_eq!(value["fajr_iqamah"], "05:30:00");
        assert_eq!(value["isha_iqamah"], "22:00:00");
        assert_eq!(value["fajr_start"], serde_json::Value::Null);
    }

    #[test]
    fn test_populated_fields_counts_times_only() {
        let extraction = Extraction {
            fajr_iqamah: Some("5:30 AM".to_string()),
            maghrib_iqamah: Some("nonsense".to_string()),
            ..Default::default()
        };
        let record = PrayerTimes::from_extraction(
            "Baitul Aman",
            &extraction,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            Utc::now(),
        );
        assert_eq!(record.populated_fields(), 1);
    }
}
