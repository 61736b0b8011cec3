//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::routing::get;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::embedded;
use super::routes::{ApiState, health, kpis, marketing, products, revenue};
use crate::core::config::ServerConfig;

pub struct ApiServer {
    config: ServerConfig,
    pool: PgPool,
}

impl ApiServer {
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        Self { config, pool }
    }

    pub fn router(&self) -> Router {
        let state = ApiState {
            pool: self.pool.clone(),
        };

        Router::new()
            .route("/", get(|| async { Redirect::temporary("/ui") }))
            .route("/health", get(health::health))
            .route("/kpis", get(kpis::kpis))
            .route("/revenue/by-day", get(revenue::by_day))
            .route("/revenue/by-category", get(revenue::by_category))
            .route("/top-products", get(products::top_products))
            .route("/marketing/roas-by-day", get(marketing::roas_by_day))
            .nest("/ui", Router::new().fallback(embedded::serve_assets))
            .with_state(state)
            .fallback(handle_404)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until ctrl-c
    pub async fn start(self) -> Result<()> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        let router = self.router();

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Reporting API listening on http://{addr}");
        tracing::info!("Dashboard available at http://{addr}/ui");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "not_found",
            "code": "ROUTE_NOT_FOUND",
            "message": "Unknown endpoint"
        })),
    )
}
