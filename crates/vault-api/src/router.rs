//! Route definitions for the vault HTTP API.
//!
//! All routes are organized by resource and mounted under `/v1`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with request logging and the body limit.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(folder_routes())
        .merge(item_routes())
        .merge(resource_routes())
        .merge(share_routes());

    Router::new()
        .nest("/v1", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and store ping; unauthenticated
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Folder create, list, get, update
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder).put(handlers::folder::update_folder),
        )
}

/// Item create, list, get, update
fn item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(handlers::item::list_items).post(handlers::item::create_item),
        )
        .route(
            "/items/{id}",
            get(handlers::item::get_item).put(handlers::item::update_item),
        )
}

/// Kind-generic delete and grant listing
fn resource_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/resources/{kind}/{id}",
            delete(handlers::resource::delete_resource),
        )
        .route(
            "/resources/{kind}/{id}/grants",
            get(handlers::resource::list_grants),
        )
}

/// Share and revoke
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/share", post(handlers::share::share_resource))
        .route("/share/revoke", post(handlers::share::revoke_access))
}
