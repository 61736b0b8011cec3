//! `customers.json`: flat JSON array, one object per customer

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{file_name, parse_timestamp, read_to_string};
use crate::data::error::DataError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCustomer {
    pub customer_id: i64,
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub segment: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CustomerRow {
    pub customer_id: i64,
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub segment: String,
    pub created_at: DateTime<Utc>,
}

/// Read and coerce the customers file
pub fn read_customers(path: &Path) -> Result<Vec<CustomerRow>, DataError> {
    let file = file_name(path);
    let content = read_to_string(path)?;
    let raw: Vec<RawCustomer> =
        serde_json::from_str(&content).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    raw.into_iter()
        .map(|raw| {
            Ok(CustomerRow {
                customer_id: raw.customer_id,
                full_name: raw.full_name,
                email: raw.email,
                country: raw.country,
                segment: raw.segment,
                created_at: parse_timestamp(&file, "created_at", &raw.created_at)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_customers_flat_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        std::fs::write(
            &path,
            r#"[{"customer_id":7,"full_name":"Ada Moreau","email":"ada.moreau@example.net",
                "country":"FR","segment":"consumer","created_at":"2025-02-14T10:00:00"}]"#,
        )
        .unwrap();

        let rows = read_customers(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_id, 7);
        assert_eq!(rows[0].country, "FR");
    }

    #[test]
    fn test_envelope_shape_is_rejected() {
        // customers.json is a flat array, not an API envelope
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        std::fs::write(&path, r#"{"data":[]}"#).unwrap();
        assert!(matches!(
            read_customers(&path).unwrap_err(),
            DataError::Json { .. }
        ));
    }
}
