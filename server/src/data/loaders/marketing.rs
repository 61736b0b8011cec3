//! Marketing spend loader: `marketing.csv` → `marketing_spend` (atomic replace)

use std::path::Path;

use sqlx::{PgPool, QueryBuilder};

use super::{INSERT_CHUNK, begin_staging, commit_swap};
use crate::core::constants::{FILE_MARKETING, TABLE_MARKETING};
use crate::data::error::DataError;
use crate::data::raw::{MarketingRow, read_marketing};

pub async fn load(pool: &PgPool, raw_dir: &Path) -> Result<u64, DataError> {
    let path = raw_dir.join(FILE_MARKETING);
    let rows = read_marketing(&path)?;

    let staging = begin_staging(pool, TABLE_MARKETING).await?;
    insert(pool, &staging, &rows).await?;
    commit_swap(pool, TABLE_MARKETING, &staging).await?;

    tracing::info!(rows = rows.len(), table = TABLE_MARKETING, "Loaded marketing spend");
    Ok(rows.len() as u64)
}

async fn insert(pool: &PgPool, table: &str, rows: &[MarketingRow]) -> Result<(), DataError> {
    for chunk in rows.chunks(INSERT_CHUNK) {
        let mut builder =
            QueryBuilder::new(format!("INSERT INTO {table} (date, channel, spend_eur) "));
        builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.date)
                .push_bind(&row.channel)
                .push_bind(row.spend_eur);
        });
        builder.build().execute(pool).await?;
    }
    Ok(())
}
