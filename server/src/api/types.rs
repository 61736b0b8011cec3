//! Shared API types: error responses and query-parameter parsing

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn from_sqlx(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Warehouse query failed");
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD` query parameters, shared by every
/// reporting endpoint
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeQuery {
    /// Both bounds are required; `example` is shown when they are missing
    /// (e.g. `/kpis?start=2025-01-01&end=2025-01-31`).
    pub fn resolve(&self, example: &str) -> Result<(NaiveDate, NaiveDate), ApiError> {
        let (Some(start), Some(end)) = (self.start.as_deref(), self.end.as_deref()) else {
            return Err(ApiError::bad_request(
                "MISSING_RANGE",
                format!("Please provide start and end. Example: {example}"),
            ));
        };
        Ok((parse_date_param("start", start)?, parse_date_param("end", end)?))
    }
}

fn parse_date_param(name: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::bad_request(
            "INVALID_DATE",
            format!("Invalid {name} date: {value}. Use YYYY-MM-DD."),
        )
    })
}

/// Response envelope for range-scoped report endpoints: the requested window
/// echoed back plus the rows
#[derive(Debug, Serialize)]
pub struct RangeResponse<T: Serialize> {
    pub start: String,
    pub end: String,
    pub data: Vec<T>,
}

impl<T: Serialize> RangeResponse<T> {
    pub fn new(start: NaiveDate, end: NaiveDate, data: Vec<T>) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_query_requires_both_bounds() {
        let query = RangeQuery {
            start: Some("2025-01-01".to_string()),
            end: None,
        };
        let err = query.resolve("/kpis?start=...&end=...").unwrap_err();
        match err {
            ApiError::BadRequest { code, message } => {
                assert_eq!(code, "MISSING_RANGE");
                assert!(message.contains("/kpis"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_range_query_parses_iso_dates() {
        let query = RangeQuery {
            start: Some("2025-01-01".to_string()),
            end: Some("2025-01-31".to_string()),
        };
        let (start, end) = query.resolve("/kpis").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[test]
    fn test_range_query_rejects_non_iso_dates() {
        let query = RangeQuery {
            start: Some("01/31/2025".to_string()),
            end: Some("2025-02-01".to_string()),
        };
        let err = query.resolve("/kpis").unwrap_err();
        match err {
            ApiError::BadRequest { code, message } => {
                assert_eq!(code, "INVALID_DATE");
                assert!(message.contains("01/31/2025"), "{message}");
                assert!(message.contains("YYYY-MM-DD"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = ApiError::bad_request("MISSING_RANGE", "nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
