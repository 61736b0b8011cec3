//! `/kpis`: headline metrics for a date window

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;
use sqlx::prelude::FromRow;

use super::ApiState;
use crate::api::types::{ApiError, RangeQuery};

/// Headline metrics over the requested window. Ratio metrics are null when
/// the window contains no orders.
#[derive(Debug, Serialize, FromRow)]
pub struct Kpis {
    pub revenue_net: f64,
    pub refunds_total: f64,
    pub revenue_after_refunds: f64,
    pub orders: i64,
    pub order_lines: i64,
    pub refund_rate_pct: Option<f64>,
    pub aov: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct KpisResponse {
    pub start: String,
    pub end: String,
    pub kpis: Kpis,
}

// Refunds join on order_line_id regardless of refund date: a sale inside the
// window counts its refund even when the refund landed after the window.
const SQL: &str = "\
    WITH base AS ( \
      SELECT ol.order_id, ol.order_line_id, ol.net_revenue \
      FROM public.order_lines ol \
      WHERE ol.order_timestamp::date BETWEEN $1 AND $2 \
    ), \
    refunds AS ( \
      SELECT r.order_line_id, r.refund_amount FROM public.returns r \
    ) \
    SELECT \
      ROUND(COALESCE(SUM(base.net_revenue), 0)::numeric, 2)::float8 AS revenue_net, \
      ROUND(COALESCE(SUM(COALESCE(refunds.refund_amount, 0)), 0)::numeric, 2)::float8 AS refunds_total, \
      ROUND(COALESCE(SUM(base.net_revenue) - SUM(COALESCE(refunds.refund_amount, 0)), 0)::numeric, 2)::float8 AS revenue_after_refunds, \
      COUNT(DISTINCT base.order_id) AS orders, \
      COUNT(base.order_line_id) AS order_lines, \
      ROUND(100.0 * COUNT(refunds.order_line_id) / NULLIF(COUNT(base.order_line_id), 0), 2)::float8 AS refund_rate_pct, \
      ROUND((SUM(base.net_revenue) / NULLIF(COUNT(DISTINCT base.order_id), 0))::numeric, 2)::float8 AS aov \
    FROM base \
    LEFT JOIN refunds ON refunds.order_line_id = base.order_line_id";

pub async fn kpis(
    State(state): State<ApiState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<KpisResponse>, ApiError> {
    let (start, end) = range.resolve("/kpis?start=2025-01-01&end=2025-01-31")?;

    let kpis: Kpis = sqlx::query_as(SQL)
        .bind(start)
        .bind(end)
        .fetch_one(&state.pool)
        .await
        .map_err(ApiError::from_sqlx)?;

    Ok(Json(KpisResponse {
        start: start.to_string(),
        end: end.to_string(),
        kpis,
    }))
}
