//! Reporting API endpoints

pub mod health;
pub mod kpis;
pub mod marketing;
pub mod products;
pub mod revenue;

use sqlx::PgPool;

/// Shared state for the reporting endpoints
#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
}
