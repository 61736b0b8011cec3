//! `/revenue/by-day` and `/revenue/by-category`

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::prelude::FromRow;

use super::ApiState;
use crate::api::types::{ApiError, RangeQuery, RangeResponse};

#[derive(Debug, Serialize, FromRow)]
pub struct DayRevenue {
    pub day: NaiveDate,
    pub revenue_net: f64,
    pub orders: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue_net: f64,
    pub orders: i64,
}

pub async fn by_day(
    State(state): State<ApiState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<RangeResponse<DayRevenue>>, ApiError> {
    let (start, end) = range.resolve("/revenue/by-day?start=YYYY-MM-DD&end=YYYY-MM-DD")?;

    let rows: Vec<DayRevenue> = sqlx::query_as(
        "SELECT \
           ol.order_timestamp::date AS day, \
           ROUND(SUM(ol.net_revenue)::numeric, 2)::float8 AS revenue_net, \
           COUNT(DISTINCT ol.order_id) AS orders \
         FROM public.order_lines ol \
         WHERE ol.order_timestamp::date BETWEEN $1 AND $2 \
         GROUP BY 1 \
         ORDER BY 1",
    )
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await
    .map_err(ApiError::from_sqlx)?;

    Ok(Json(RangeResponse::new(start, end, rows)))
}

pub async fn by_category(
    State(state): State<ApiState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<RangeResponse<CategoryRevenue>>, ApiError> {
    let (start, end) = range.resolve("/revenue/by-category?start=YYYY-MM-DD&end=YYYY-MM-DD")?;

    // Inner join: order lines pointing at unknown products are excluded here
    // and surfaced by the validator's orphan check instead
    let rows: Vec<CategoryRevenue> = sqlx::query_as(
        "SELECT \
           p.category, \
           ROUND(SUM(ol.net_revenue)::numeric, 2)::float8 AS revenue_net, \
           COUNT(DISTINCT ol.order_id) AS orders \
         FROM public.order_lines ol \
         JOIN public.products p ON p.product_id = ol.product_id \
         WHERE ol.order_timestamp::date BETWEEN $1 AND $2 \
         GROUP BY 1 \
         ORDER BY revenue_net DESC",
    )
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await
    .map_err(ApiError::from_sqlx)?;

    Ok(Json(RangeResponse::new(start, end, rows)))
}
