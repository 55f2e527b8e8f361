//! HTTP endpoint for Prometheus scraping.
//!
//! Serves `GET /metrics` in the text exposition format on its own task.

use axum::{Router, http::header, response::IntoResponse, routing::get};
use std::net::SocketAddr;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        crate::metrics::gather_metrics(),
    )
}

/// The metrics router.
pub fn router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serve metrics on `0.0.0.0:port` until the task is dropped.
pub async fn run_http_server(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind metrics endpoint");
            return;
        }
    };
    tracing::info!(%addr, "Metrics endpoint listening");

    if let Err(e) = axum::serve(listener, router()).await {
        tracing::error!(error = %e, "Metrics endpoint stopped");
    }
}
