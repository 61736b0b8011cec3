//! `marketing.csv`: daily spend per channel, columns `date,channel,spend_eur`

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{file_name, parse_date};
use crate::data::error::DataError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMarketing {
    pub date: String,
    pub channel: String,
    pub spend_eur: f64,
}

#[derive(Debug, Clone)]
pub struct MarketingRow {
    pub date: NaiveDate,
    pub channel: String,
    pub spend_eur: f64,
}

/// Read and coerce the marketing spend file
pub fn read_marketing(path: &Path) -> Result<Vec<MarketingRow>, DataError> {
    let file = file_name(path);

    let mut reader = csv::Reader::from_path(path).map_err(|source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<RawMarketing>() {
        let raw = record.map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(MarketingRow {
            date: parse_date(&file, "date", &raw.date)?,
            channel: raw.channel,
            spend_eur: raw.spend_eur,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_marketing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marketing.csv");
        std::fs::write(
            &path,
            "date,channel,spend_eur\n2025-03-01,google_ads,431.20\n2025-03-01,email,55.00\n",
        )
        .unwrap();

        let rows = read_marketing(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].channel, "google_ads");
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert!((rows[1].spend_eur - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_numeric_spend_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marketing.csv");
        std::fs::write(&path, "date,channel,spend_eur\n2025-03-01,email,lots\n").unwrap();
        assert!(matches!(
            read_marketing(&path).unwrap_err(),
            DataError::Csv { .. }
        ));
    }

    #[test]
    fn test_bad_date_names_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marketing.csv");
        std::fs::write(&path, "date,channel,spend_eur\nMarch 1st,email,10.0\n").unwrap();
        assert!(matches!(
            read_marketing(&path).unwrap_err(),
            DataError::Coercion { column: "date", .. }
        ));
    }
}
