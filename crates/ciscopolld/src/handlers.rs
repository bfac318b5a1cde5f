//! HTTP request handlers: scrape endpoint and health.

use std::time::Instant;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tracing::{debug, error};

use ciscopoll_core::metrics::{CONTENT_TYPE, Sample};

use crate::state::SharedState;

pub(crate) fn router(state: SharedState, telemetry_path: &str) -> Router {
    Router::new()
        .route(telemetry_path, get(handle_metrics))
        .route("/health", get(handle_health))
        .with_state(state)
        .layer(CompressionLayer::new())
}

// ============================================================
// Health
// ============================================================

#[derive(Serialize)]
pub(crate) struct Health {
    status: &'static str,
    version: &'static str,
}

pub(crate) async fn handle_health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: ciscopoll_core::VERSION,
    })
}

// ============================================================
// Metrics
// ============================================================

#[derive(Deserialize)]
pub(crate) struct ScrapeParams {
    /// Polls only this host instead of the configured targets.
    target: Option<String>,
}

/// Polls the targets and renders the result in the Prometheus text format.
pub(crate) async fn handle_metrics(
    State(state): State<SharedState>,
    Query(params): Query<ScrapeParams>,
) -> Response {
    let targets = match params.target.as_deref().map(str::trim) {
        Some(target) if !target.is_empty() => vec![target.to_string()],
        _ => state.inventory.hosts(),
    };

    let started = Instant::now();
    let count = targets.len();
    let worker = state.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let samples: Vec<Sample> = worker
            .poll(&targets)
            .into_iter()
            .flat_map(|report| report.samples)
            .collect();
        worker.exposition.render(&samples)
    })
    .await;

    match rendered {
        Ok(Ok(body)) => {
            debug!(
                targets = count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "scrape complete"
            );
            ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
        }
        Ok(Err(e)) => {
            error!(error = %e, "failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            error!(error = %e, "poll task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "poll task failed").into_response()
        }
    }
}
