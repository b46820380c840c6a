//! JSON API route handlers.
//!
//! Endpoints called by the host discount engine and admin scripts.

pub mod requirements;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(requirements::router())
}
