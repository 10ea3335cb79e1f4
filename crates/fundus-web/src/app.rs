use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use fundus_storage::store::RecordStore;

use crate::middleware;
use crate::routes;
use crate::state::AppState;

pub fn router<S: RecordStore>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/", get(routes::page::show::<S>))
        .route("/verify", post(routes::page::verify::<S>))
        .route("/logout", post(routes::page::logout::<S>))
        .route("/report.pdf", get(routes::report::download::<S>))
        .route("/feedback", post(routes::feedback::submit::<S>))
        .route("/api/results", get(routes::report::results_json::<S>))
        .layer(axum_mw::from_fn(middleware::request_log::request_log))
        .layer(cors)
        .with_state(state)
}
