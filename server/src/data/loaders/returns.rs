//! Returns loader: `returns.xlsx` → `returns` (atomic replace)

use std::path::Path;

use sqlx::{PgPool, QueryBuilder};

use super::{INSERT_CHUNK, begin_staging, commit_swap};
use crate::core::constants::{FILE_RETURNS, TABLE_RETURNS};
use crate::data::error::DataError;
use crate::data::raw::{ReturnRow, read_returns};

pub async fn load(pool: &PgPool, raw_dir: &Path) -> Result<u64, DataError> {
    let path = raw_dir.join(FILE_RETURNS);
    let rows = read_returns(&path)?;

    let staging = begin_staging(pool, TABLE_RETURNS).await?;
    insert(pool, &staging, &rows).await?;
    commit_swap(pool, TABLE_RETURNS, &staging).await?;

    tracing::info!(rows = rows.len(), table = TABLE_RETURNS, "Loaded returns");
    Ok(rows.len() as u64)
}

async fn insert(pool: &PgPool, table: &str, rows: &[ReturnRow]) -> Result<(), DataError> {
    for chunk in rows.chunks(INSERT_CHUNK) {
        let mut builder = QueryBuilder::new(format!(
            "INSERT INTO {table} (order_line_id, order_id, customer_id, product_id, \
             order_timestamp, refund_timestamp, refund_amount, reason) "
        ));
        builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.order_line_id)
                .push_bind(row.order_id)
                .push_bind(row.customer_id)
                .push_bind(row.product_id)
                .push_bind(row.order_timestamp)
                .push_bind(row.refund_timestamp)
                .push_bind(row.refund_amount)
                .push_bind(&row.reason);
        });
        builder.build().execute(pool).await?;
    }
    Ok(())
}
