use axum::Router;
use axum::extract::State;
use axum::routing::get;
use std::sync::Arc;

pub mod api;
pub mod app_env;
pub mod config;
pub mod db;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routing_utils;

/// Data shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Extractor for the application's shared state
pub type AppState = State<Arc<SharedData>>;

/// Builds the full application: the index page, the todo API, its documentation, and
/// per-request tracing
pub fn app_router(shared_data: Arc<SharedData>) -> Router {
    let router = Router::new()
        .route("/", get(api::index::index_page))
        .merge(api::todo::todo_routes())
        .merge(api::swagger_main::build_documentation())
        .with_state(shared_data);

    logging::attach_tracing_http(router)
}
