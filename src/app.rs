use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", post(handlers::login))
        .route("/query", get(handlers::query))
        .route("/export", get(handlers::export))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
