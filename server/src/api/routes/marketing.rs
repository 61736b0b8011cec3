//! `/marketing/roas-by-day`: revenue against marketing spend

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::prelude::FromRow;

use super::ApiState;
use crate::api::types::{ApiError, RangeQuery, RangeResponse};

/// One day of revenue vs spend. `roas` is null on days with no spend.
#[derive(Debug, Serialize, FromRow)]
pub struct RoasDay {
    pub day: NaiveDate,
    pub revenue_net: f64,
    pub spend_eur: f64,
    pub roas: Option<f64>,
}

pub async fn roas_by_day(
    State(state): State<ApiState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<RangeResponse<RoasDay>>, ApiError> {
    let (start, end) = range.resolve("/marketing/roas-by-day?start=YYYY-MM-DD&end=YYYY-MM-DD")?;

    // Full outer join keeps days that only have spend (no revenue) and days
    // that only have revenue (no spend)
    let rows: Vec<RoasDay> = sqlx::query_as(
        "WITH rev AS ( \
           SELECT ol.order_timestamp::date AS day, SUM(ol.net_revenue) AS revenue_net \
           FROM public.order_lines ol \
           WHERE ol.order_timestamp::date BETWEEN $1 AND $2 \
           GROUP BY 1 \
         ), \
         spend AS ( \
           SELECT ms.date AS day, SUM(ms.spend_eur) AS spend_eur \
           FROM public.marketing_spend ms \
           WHERE ms.date BETWEEN $1 AND $2 \
           GROUP BY 1 \
         ) \
         SELECT \
           COALESCE(rev.day, spend.day) AS day, \
           ROUND(COALESCE(rev.revenue_net, 0)::numeric, 2)::float8 AS revenue_net, \
           ROUND(COALESCE(spend.spend_eur, 0)::numeric, 2)::float8 AS spend_eur, \
           ROUND((COALESCE(rev.revenue_net, 0) / NULLIF(COALESCE(spend.spend_eur, 0), 0))::numeric, 4)::float8 AS roas \
         FROM rev \
         FULL OUTER JOIN spend ON spend.day = rev.day \
         ORDER BY 1",
    )
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await
    .map_err(ApiError::from_sqlx)?;

    Ok(Json(RangeResponse::new(start, end, rows)))
}
