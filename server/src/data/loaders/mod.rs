//! Per-entity loaders
//!
//! Each loader reads one raw file, coerces it to typed rows, and writes one
//! warehouse table. products, orders, marketing, and returns fully replace
//! their table via a staging swap: rows are inserted into `<table>_staging`
//! and the tables are swapped in a single transaction, so readers never see
//! the empty window a plain truncate-then-insert leaves and a failed load
//! keeps the previous contents. customers is append-only and accumulates
//! duplicate rows across runs.
//!
//! Failure modes are all fatal for the run: missing file, coercion failure,
//! connectivity failure. There is no retry or partial-row recovery.

pub mod customers;
pub mod marketing;
pub mod orders;
pub mod products;
pub mod returns;

use std::path::Path;

use sqlx::PgPool;

use super::error::DataError;
use crate::core::cli::LoadStage;

/// Rows per batch insert statement (well inside the bind-parameter limit for
/// the widest table, order_lines at 10 columns)
pub(crate) const INSERT_CHUNK: usize = 1000;

/// Run one loader stage. Returns the number of rows written.
pub async fn run(stage: LoadStage, raw_dir: &Path, pool: &PgPool) -> Result<u64, DataError> {
    match stage {
        LoadStage::Products => products::load(pool, raw_dir).await,
        LoadStage::Customers => customers::load(pool, raw_dir).await,
        LoadStage::Orders => orders::load(pool, raw_dir).await,
        LoadStage::Marketing => marketing::load(pool, raw_dir).await,
        LoadStage::Returns => returns::load(pool, raw_dir).await,
    }
}

/// Create (or reset) the staging table for an atomic replace.
///
/// `LIKE ... INCLUDING ALL` copies column definitions and indexes; the
/// warehouse tables carry no constraints the copy could conflict with.
pub(crate) async fn begin_staging(pool: &PgPool, table: &str) -> Result<String, DataError> {
    let staging = format!("{table}_staging");
    sqlx::query(&format!("DROP TABLE IF EXISTS {staging}"))
        .execute(pool)
        .await?;
    sqlx::query(&format!(
        "CREATE TABLE {staging} (LIKE {table} INCLUDING ALL)"
    ))
    .execute(pool)
    .await?;
    Ok(staging)
}

/// Swap the fully loaded staging table into place, one transaction.
pub(crate) async fn commit_swap(pool: &PgPool, table: &str, staging: &str) -> Result<(), DataError> {
    let mut tx = pool.begin().await?;
    sqlx::query(&format!("DROP TABLE {table}"))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("ALTER TABLE {staging} RENAME TO {table}"))
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
