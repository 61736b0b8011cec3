//! `/top-products`: best sellers by net revenue

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use super::ApiState;
use crate::api::types::{ApiError, RangeQuery, RangeResponse};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

// RangeQuery is not flattened here: serde_urlencoded cannot deserialize
// numeric fields next to a flattened struct
#[derive(Debug, Deserialize)]
pub struct TopProductsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct TopProduct {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub units_sold: i64,
    pub revenue_net: f64,
}

pub async fn top_products(
    State(state): State<ApiState>,
    Query(query): Query<TopProductsQuery>,
) -> Result<Json<RangeResponse<TopProduct>>, ApiError> {
    let range = RangeQuery {
        start: query.start,
        end: query.end,
    };
    let (start, end) = range.resolve("/top-products?start=YYYY-MM-DD&end=YYYY-MM-DD&limit=10")?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit < 1 || limit > MAX_LIMIT {
        return Err(ApiError::bad_request(
            "INVALID_LIMIT",
            format!("limit must be between 1 and {MAX_LIMIT}"),
        ));
    }

    let rows: Vec<TopProduct> = sqlx::query_as(
        "SELECT \
           p.product_id, \
           p.name, \
           p.category, \
           SUM(ol.qty)::bigint AS units_sold, \
           ROUND(SUM(ol.net_revenue)::numeric, 2)::float8 AS revenue_net \
         FROM public.order_lines ol \
         JOIN public.products p ON p.product_id = ol.product_id \
         WHERE ol.order_timestamp::date BETWEEN $1 AND $2 \
         GROUP BY 1, 2, 3 \
         ORDER BY revenue_net DESC \
         LIMIT $3",
    )
    .bind(start)
    .bind(end)
    .bind(limit)
    .fetch_all(&state.pool)
    .await
    .map_err(ApiError::from_sqlx)?;

    Ok(Json(RangeResponse::new(start, end, rows)))
}
