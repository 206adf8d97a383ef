use axum::{Router, routing::get};

pub mod health;

/// API routes without the `/api` prefix; `create_router` adds it
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest(
        "/sellers",
        domain_sellers::handlers::router(state.sellers.clone()),
    )
}

/// `/ready`, checked against the live database
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
