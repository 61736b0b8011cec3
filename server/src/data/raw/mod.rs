//! Raw source file formats
//!
//! One module per source file: serde representation of the on-disk format,
//! the coerced typed row the loader inserts, and the reader that performs
//! the coercion. Any value that cannot be coerced to its declared column
//! type fails the whole run with a [`DataError::Coercion`].

pub mod customers;
pub mod marketing;
pub mod orders;
pub mod products;
pub mod returns;

pub use customers::{CustomerRow, RawCustomer, read_customers};
pub use marketing::{MarketingRow, RawMarketing, read_marketing};
pub use orders::{OrderLineRow, RawOrderLine, read_orders};
pub use products::{ProductRow, RawProduct, read_products};
pub use returns::{ReturnRow, read_returns};

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::error::DataError;

/// Envelope used by the API-shaped JSON files (products, orders)
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Vec<T>,
    pub source: String,
    pub generated_at: String,
}

impl<T> ApiEnvelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            source: "fake_api".to_string(),
            generated_at: format_timestamp(&Utc::now()),
        }
    }
}

/// Serialization format for timestamps in the raw files (naive ISO 8601, UTC)
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Coerce an ISO 8601 timestamp string, with or without offset, to UTC
pub fn parse_timestamp(
    file: &str,
    column: &'static str,
    value: &str,
) -> Result<DateTime<Utc>, DataError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(DataError::coercion(
        file,
        column,
        value,
        "expected an ISO 8601 timestamp",
    ))
}

/// Coerce a `YYYY-MM-DD` date string
pub fn parse_date(file: &str, column: &'static str, value: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DataError::coercion(file, column, value, "expected a YYYY-MM-DD date"))
}

/// File name for error messages
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a raw file to a string, mapping IO failures to [`DataError::RawFile`]
pub(crate) fn read_to_string(path: &Path) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|source| DataError::RawFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_timestamp_naive_iso() {
        let ts = parse_timestamp("t.json", "created_at", "2025-06-21T14:30:05").unwrap();
        assert_eq!(ts.hour(), 14);
        assert_eq!(ts.to_rfc3339(), "2025-06-21T14:30:05+00:00");
    }

    #[test]
    fn test_parse_timestamp_with_offset_normalizes_to_utc() {
        let ts = parse_timestamp("t.json", "created_at", "2025-06-21T14:30:05+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-06-21T12:30:05+00:00");
    }

    #[test]
    fn test_parse_timestamp_with_fraction() {
        let ts = parse_timestamp("t.json", "updated_at", "2025-06-21 14:30:05.123456").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("orders_api.json", "order_timestamp", "yesterday").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("order_timestamp"), "{msg}");
        assert!(msg.contains("orders_api.json"), "{msg}");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("marketing.csv", "date", "2025-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
        assert!(parse_date("marketing.csv", "date", "03/09/2025").is_err());
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 58).unwrap();
        let parsed = parse_timestamp("t", "c", &format_timestamp(&ts)).unwrap();
        assert_eq!(parsed, ts);
    }
}
