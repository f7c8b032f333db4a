pub mod aois;
pub mod health;
pub mod observations;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let body_limit = RequestBodyLimitLayer::new(state.config().max_body_bytes);
    Router::new()
        .merge(health::routes())
        .merge(aois::routes())
        .merge(observations::routes())
        .layer(body_limit)
        .with_state(state)
}
