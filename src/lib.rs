//! Sales order batch service: fetch, insert, update and delete orders with
//! their line items, each call as one atomic unit of work.

pub mod aggregator;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod models;
pub mod repository;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    routes::{create_api_router, doc::scalar_docs, health},
    state::AppState,
};

/// Application routes with state bound; middleware is layered on by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
