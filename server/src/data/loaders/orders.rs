//! Order lines loader: `orders_api.json` → `order_lines` (atomic replace)
//!
//! Runs after products and customers so the dimension rows the fact lines
//! reference already exist. Nothing enforces that here; the validator's
//! orphan checks catch violations after the fact.

use std::path::Path;

use sqlx::{PgPool, QueryBuilder};

use super::{INSERT_CHUNK, begin_staging, commit_swap};
use crate::core::constants::{FILE_ORDERS, TABLE_ORDER_LINES};
use crate::data::error::DataError;
use crate::data::raw::{OrderLineRow, read_orders};

pub async fn load(pool: &PgPool, raw_dir: &Path) -> Result<u64, DataError> {
    let path = raw_dir.join(FILE_ORDERS);
    let rows = read_orders(&path)?;

    let staging = begin_staging(pool, TABLE_ORDER_LINES).await?;
    insert(pool, &staging, &rows).await?;
    commit_swap(pool, TABLE_ORDER_LINES, &staging).await?;

    tracing::info!(rows = rows.len(), table = TABLE_ORDER_LINES, "Loaded order lines");
    Ok(rows.len() as u64)
}

async fn insert(pool: &PgPool, table: &str, rows: &[OrderLineRow]) -> Result<(), DataError> {
    for chunk in rows.chunks(INSERT_CHUNK) {
        let mut builder = QueryBuilder::new(format!(
            "INSERT INTO {table} (order_line_id, order_id, order_timestamp, customer_id, \
             product_id, qty, gross_revenue, discount_amount, net_revenue, currency) "
        ));
        builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.order_line_id)
                .push_bind(row.order_id)
                .push_bind(row.order_timestamp)
                .push_bind(row.customer_id)
                .push_bind(row.product_id)
                .push_bind(row.qty)
                .push_bind(row.gross_revenue)
                .push_bind(row.discount_amount)
                .push_bind(row.net_revenue)
                .push_bind(&row.currency);
        });
        builder.build().execute(pool).await?;
    }
    Ok(())
}
