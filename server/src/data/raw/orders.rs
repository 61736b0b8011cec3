//! `orders_api.json`: API-envelope JSON, one object per order line

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiEnvelope, file_name, parse_timestamp, read_to_string};
use crate::data::error::DataError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrderLine {
    pub order_line_id: i64,
    pub order_id: i64,
    pub order_timestamp: String,
    pub customer_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub gross_revenue: f64,
    pub discount_amount: f64,
    pub net_revenue: f64,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct OrderLineRow {
    pub order_line_id: i64,
    pub order_id: i64,
    pub order_timestamp: DateTime<Utc>,
    pub customer_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub gross_revenue: f64,
    pub discount_amount: f64,
    pub net_revenue: f64,
    pub currency: String,
}

/// Read and coerce the order lines file
pub fn read_orders(path: &Path) -> Result<Vec<OrderLineRow>, DataError> {
    let file = file_name(path);
    let content = read_to_string(path)?;
    let envelope: ApiEnvelope<RawOrderLine> =
        serde_json::from_str(&content).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    envelope
        .data
        .into_iter()
        .map(|raw| {
            Ok(OrderLineRow {
                order_line_id: raw.order_line_id,
                order_id: raw.order_id,
                order_timestamp: parse_timestamp(&file, "order_timestamp", &raw.order_timestamp)?,
                customer_id: raw.customer_id,
                product_id: raw.product_id,
                qty: raw.qty,
                gross_revenue: raw.gross_revenue,
                discount_amount: raw.discount_amount,
                net_revenue: raw.net_revenue,
                currency: raw.currency,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_orders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders_api.json");
        std::fs::write(
            &path,
            r#"{"data":[{"order_line_id":1,"order_id":1,"order_timestamp":"2025-05-02T18:45:00",
                "customer_id":12,"product_id":3,"qty":2,"gross_revenue":59.9,
                "discount_amount":5.99,"net_revenue":53.91,"currency":"EUR"}],
                "source":"fake_api","generated_at":"2025-06-21T00:00:00"}"#,
        )
        .unwrap();

        let rows = read_orders(&path).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.qty, 2);
        assert_eq!(row.currency, "EUR");
        assert!((row.net_revenue - (row.gross_revenue - row.discount_amount)).abs() < 1e-9);
    }

    #[test]
    fn test_bad_order_timestamp_names_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders_api.json");
        std::fs::write(
            &path,
            r#"{"data":[{"order_line_id":1,"order_id":1,"order_timestamp":"??",
                "customer_id":1,"product_id":1,"qty":1,"gross_revenue":1.0,
                "discount_amount":0.0,"net_revenue":1.0,"currency":"EUR"}],
                "source":"fake_api","generated_at":"x"}"#,
        )
        .unwrap();

        let err = read_orders(&path).unwrap_err();
        assert!(matches!(
            err,
            DataError::Coercion { column: "order_timestamp", .. }
        ));
    }
}
