//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                          - Liveness check
//! GET  /health/ready                                    - Database readiness check
//!
//! # Shipping country rule (discount managers only)
//! GET  /plugins/discount-rules/shipping-country/configure - Configuration form
//! POST /plugins/discount-rules/shipping-country/configure - Save configuration
//!
//! # API
//! POST /api/discount-requirements/evaluate              - Evaluate a requirement
//! GET  /api/discount-requirements/rules                 - Registered rules with configuration links
//! ```

pub mod api;
pub mod extract;
pub mod health;
pub mod shipping_country;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// All routes, still waiting for state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(shipping_country::router())
        .merge(api::router())
}

/// The application router with request tracing.
///
/// The session layer is added by the caller since the store differs between
/// production and tests.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
