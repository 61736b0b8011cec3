//! Products loader: `products_api.json` → `products` (atomic replace)

use std::path::Path;

use sqlx::{PgPool, QueryBuilder};

use super::{INSERT_CHUNK, begin_staging, commit_swap};
use crate::core::constants::{FILE_PRODUCTS, TABLE_PRODUCTS};
use crate::data::error::DataError;
use crate::data::raw::{ProductRow, read_products};

pub async fn load(pool: &PgPool, raw_dir: &Path) -> Result<u64, DataError> {
    let path = raw_dir.join(FILE_PRODUCTS);
    let rows = read_products(&path)?;

    let staging = begin_staging(pool, TABLE_PRODUCTS).await?;
    insert(pool, &staging, &rows).await?;
    commit_swap(pool, TABLE_PRODUCTS, &staging).await?;

    tracing::info!(rows = rows.len(), table = TABLE_PRODUCTS, "Loaded products");
    Ok(rows.len() as u64)
}

async fn insert(pool: &PgPool, table: &str, rows: &[ProductRow]) -> Result<(), DataError> {
    for chunk in rows.chunks(INSERT_CHUNK) {
        let mut builder = QueryBuilder::new(format!(
            "INSERT INTO {table} (product_id, name, category, price, is_active, updated_at) "
        ));
        builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.product_id)
                .push_bind(&row.name)
                .push_bind(&row.category)
                .push_bind(row.price)
                .push_bind(row.is_active)
                .push_bind(row.updated_at);
        });
        builder.build().execute(pool).await?;
    }
    Ok(())
}
