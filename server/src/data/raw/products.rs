//! `products_api.json`: API-envelope JSON with one object per product

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiEnvelope, file_name, parse_timestamp, read_to_string};
use crate::data::error::DataError;

/// On-disk representation (timestamps are ISO 8601 strings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProduct {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub is_active: bool,
    pub updated_at: String,
}

/// Coerced row ready for insertion
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Read and coerce the products file
pub fn read_products(path: &Path) -> Result<Vec<ProductRow>, DataError> {
    let file = file_name(path);
    let content = read_to_string(path)?;
    let envelope: ApiEnvelope<RawProduct> =
        serde_json::from_str(&content).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    envelope
        .data
        .into_iter()
        .map(|raw| {
            Ok(ProductRow {
                product_id: raw.product_id,
                name: raw.name,
                category: raw.category,
                price: raw.price,
                is_active: raw.is_active,
                updated_at: parse_timestamp(&file, "updated_at", &raw.updated_at)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_products_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products_api.json");
        std::fs::write(
            &path,
            r#"{"data":[{"product_id":1,"name":"Quiet Lantern","category":"home",
                "price":39.95,"is_active":true,"updated_at":"2025-06-01T08:00:00"}],
                "source":"fake_api","generated_at":"2025-06-21T00:00:00"}"#,
        )
        .unwrap();

        let rows = read_products(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id, 1);
        assert_eq!(rows[0].category, "home");
        assert!(rows[0].is_active);
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products_api.json");
        std::fs::write(
            &path,
            r#"{"data":[{"product_id":1,"name":"X","category":"books",
                "price":5.0,"is_active":false,"updated_at":"soon"}],
                "source":"fake_api","generated_at":"2025-06-21T00:00:00"}"#,
        )
        .unwrap();

        let err = read_products(&path).unwrap_err();
        assert!(matches!(err, DataError::Coercion { column: "updated_at", .. }));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = read_products(Path::new("/nonexistent/products_api.json")).unwrap_err();
        assert!(matches!(err, DataError::RawFile { .. }));
    }
}
