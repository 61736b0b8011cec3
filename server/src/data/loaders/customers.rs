//! Customers loader: `customers.json` → `customers`
//!
//! Append-only: re-running this loader without clearing the warehouse first
//! duplicates customer rows. There is no uniqueness constraint to stop it;
//! the other loaders replace their tables, this one does not.

use std::path::Path;

use sqlx::{PgPool, QueryBuilder};

use super::INSERT_CHUNK;
use crate::core::constants::{FILE_CUSTOMERS, TABLE_CUSTOMERS};
use crate::data::error::DataError;
use crate::data::raw::{CustomerRow, read_customers};

pub async fn load(pool: &PgPool, raw_dir: &Path) -> Result<u64, DataError> {
    let path = raw_dir.join(FILE_CUSTOMERS);
    let rows = read_customers(&path)?;

    insert(pool, TABLE_CUSTOMERS, &rows).await?;

    tracing::info!(rows = rows.len(), table = TABLE_CUSTOMERS, "Loaded customers");
    Ok(rows.len() as u64)
}

async fn insert(pool: &PgPool, table: &str, rows: &[CustomerRow]) -> Result<(), DataError> {
    for chunk in rows.chunks(INSERT_CHUNK) {
        let mut builder = QueryBuilder::new(format!(
            "INSERT INTO {table} (customer_id, full_name, email, country, segment, created_at) "
        ));
        builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.customer_id)
                .push_bind(&row.full_name)
                .push_bind(&row.email)
                .push_bind(&row.country)
                .push_bind(&row.segment)
                .push_bind(row.created_at);
        });
        builder.build().execute(pool).await?;
    }
    Ok(())
}
