use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::error::ScrapeError;
use crate::model::PrayerTimes;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS prayer_times (
    mosque_name     TEXT PRIMARY KEY,
    date            TEXT NOT NULL,
    fajr_start      TEXT,
    fajr_iqamah     TEXT,
    zuhr_start      TEXT,
    zuhr_iqamah     TEXT,
    asr_start       TEXT,
    asr_iqamah      TEXT,
    maghrib_start   TEXT,
    maghrib_iqamah  TEXT,
    isha_start      TEXT,
    isha_iqamah     TEXT,
    jummah1_start   TEXT,
    jummah1_iqamah  TEXT,
    jummah2_start   TEXT,
    jummah2_iqamah  TEXT,
    jummah3_start   TEXT,
    jummah3_iqamah  TEXT,
    updated_at      TEXT NOT NULL
)";

const COLUMNS: &str = "mosque_name, date, \
    fajr_start, fajr_iqamah, zuhr_start, zuhr_iqamah, asr_start, asr_iqamah, \
    maghrib_start, maghrib_iqamah, isha_start, isha_iqamah, \
    jummah1_start, jummah1_iqamah, jummah2_start, jummah2_iqamah, \
    jummah3_start, jummah3_iqamah, updated_at";

/// SQLite-backed record store: one current schedule per mosque name.
///
/// Writers touch disjoint keys (each scrape task upserts its own mosque),
/// so a single connection behind a mutex is plenty.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory store, for tests.
    pub fn open_in_memory() -> Result<Self, ScrapeError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, ScrapeError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// A panic in one scrape task must not take the store down with it, so
    /// a poisoned lock is recovered rather than propagated.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert or wholly replace the record for a mosque.
    ///
    /// Unconditional overwrite: no field-level merge with the prior record.
    pub fn upsert(&self, record: &PrayerTimes) -> Result<(), ScrapeError> {
        let conn = self.conn();
        conn.execute(
            &format!(
                "INSERT INTO prayer_times ({COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, \
                         ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19) \
                 ON CONFLICT(mosque_name) DO UPDATE SET \
                    date = excluded.date, \
                    fajr_start = excluded.fajr_start, \
                    fajr_iqamah = excluded.fajr_iqamah, \
                    zuhr_start = excluded.zuhr_start, \
                    zuhr_iqamah = excluded.zuhr_iqamah, \
                    asr_start = excluded.asr_start, \
                    asr_iqamah = excluded.asr_iqamah, \
                    maghrib_start = excluded.maghrib_start, \
                    maghrib_iqamah = excluded.maghrib_iqamah, \
                    isha_start = excluded.isha_start, \
                    isha_iqamah = excluded.isha_iqamah, \
                    jummah1_start = excluded.jummah1_start, \
                    jummah1_iqamah = excluded.jummah1_iqamah, \
                    jummah2_start = excluded.jummah2_start, \
                    jummah2_iqamah = excluded.jummah2_iqamah, \
                    jummah3_start = excluded.jummah3_start, \
                    jummah3_iqamah = excluded.jummah3_iqamah, \
                    updated_at = excluded.updated_at"
            ),
            params![
                record.mosque_name,
                record.date.format("%Y-%m-%d").to_string(),
                fmt_time(record.fajr_start),
                fmt_time(record.fajr_iqamah),
                fmt_time(record.zuhr_start),
                fmt_time(record.zuhr_iqamah),
                fmt_time(record.asr_start),
                fmt_time(record.asr_iqamah),
                fmt_time(record.maghrib_start),
                fmt_time(record.maghrib_iqamah),
                fmt_time(record.isha_start),
                fmt_time(record.isha_iqamah),
                fmt_time(record.jummah1_start),
                fmt_time(record.jummah1_iqamah),
                fmt_time(record.jummah2_start),
                fmt_time(record.jummah2_iqamah),
                fmt_time(record.jummah3_start),
                fmt_time(record.jummah3_iqamah),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All current records, one per mosque.
    pub fn all(&self) -> Result<Vec<PrayerTimes>, ScrapeError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM prayer_times ORDER BY mosque_name"
        ))?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// The current record for one mosque, if any.
    pub fn get(&self, mosque_name: &str) -> Result<Option<PrayerTimes>, ScrapeError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM prayer_times WHERE mosque_name = ?1"
        ))?;
        let mut rows = stmt.query_map([mosque_name], row_to_record)?;
        rows.next().transpose().map_err(ScrapeError::from)
    }
}

fn fmt_time(time: Option<NaiveTime>) -> Option<String> {
    time.map(|t| t.format("%H:%M:%S").to_string())
}

fn time_col(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveTime>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        NaiveTime::parse_from_str(&s, "%H:%M:%S")
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn row_to_record(row: &Row) -> rusqlite::Result<PrayerTimes> {
    let date_raw: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    let updated_raw: String = row.get(18)?;
    let updated_at = DateTime::parse_from_rfc3339(&updated_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(18, Type::Text, Box::new(e)))?;

    Ok(PrayerTimes {
        mosque_name: row.get(0)?,
        date,
        fajr_start: time_col(row, 2)?,
        fajr_iqamah: time_col(row, 3)?,
        zuhr_start: time_col(row, 4)?,
        zuhr_iqamah: time_col(row, 5)?,
        asr_start: time_col(row, 6)?,
        asr_iqamah: time_col(row, 7)?,
        maghrib_start: time_col(row, 8)?,
        maghrib_iqamah: time_col(row, 9)?,
        isha_start: time_col(row, 10)?,
        isha_iqamah: time_col(row, 11)?,
        jummah1_start: time_col(row, 12)?,
        jummah1_iqamah: time_col(row, 13)?,
        jummah2_start: time_col(row, 14)?,
        jummah2_iqamah: time_col(row, 15)?,
        jummah3_start: time_col(row, 16)?,
        jummah3_iqamah: time_col(row, 17)?,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, fajr_iqamah: Option<&str>) -> PrayerTimes {
        use crate::model::Extraction;
        let extraction = Extraction {
            fajr_iqamah: fajr_iqamah.map(String::from),
            ..Default::default()
        };
        PrayerTimes::from_extraction(
            name,
            &extraction,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_upsert_and_get_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let rec = record("Baitul Aman", Some("5:30 AM"));
        store.upsert(&rec).unwrap();

        let fetched = store.get("Baitul Aman").unwrap().unwrap();
        assert_eq!(fetched.mosque_name, "Baitul Aman");
        assert_eq!(
            fetched.fajr_iqamah,
            NaiveTime::from_hms_opt(5, 30, 0)
        );
        assert_eq!(fetched.fajr_start, None);
        assert_eq!(fetched.date, rec.date);
    }

    #[test]
    fn test_upsert_replaces_whole_record() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&record("Baitul Aman", Some("5:30 AM"))).unwrap();
        // The second extraction lost the fajr time; it still wins
        store.upsert(&record("Baitul Aman", None)).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].fajr_iqamah, None);
    }

    #[test]
    fn test_records_are_keyed_per_mosque() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&record("Baitul Aman", Some("5:30 AM"))).unwrap();
        store.upsert(&record("Baitul Mukarram", Some("5:45 AM"))).unwrap();
        store.upsert(&record("Baitul Aman", Some("5:15 AM"))).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(store.get("Baitul Aman").unwrap().unwrap().fajr_iqamah,
            NaiveTime::from_hms_opt(5, 15, 0));
    }

    #[test]
    fn test_get_missing_mosque() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get("Nowhere").unwrap().is_none());
    }

    #[test]
    fn test_usable_after_poisoned_lock() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&record("Baitul Aman", Some("5:30 AM"))).unwrap();

        // Poison the mutex by panicking while holding it
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.conn.lock().unwrap();
            panic!("task died mid-write");
        }));

        store.upsert(&record("Baitul Mukarram", Some("5:45 AM"))).unwrap();
        assert_eq!(store.all().unwrap().len(), 2);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("times.db");
        {
            let store = Store::open(&path).unwrap();
            store.upsert(&record("Baitul Aman", Some("5:30 AM"))).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert!(store.get("Baitul Aman").unwrap().is_some());
    }
}
