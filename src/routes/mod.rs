//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every endpoint is a thin pass-through: extract, call a service, map the
//! error to a status code, serialize. The router carries a permissive CORS
//! layer for the browser frontend.

pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod faculty;
pub mod search;

use axum::Router;
use axum::response::Json;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Assemble the API router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/search/all", post(search::search_all))
        .route("/api/search/faculty", post(search::search_faculty))
        .route("/api/search/publications", post(search::search_publications))
        .route("/api/search/classify-domain", post(search::classify_domain))
        .route("/api/search/filter-options", get(search::filter_options))
        .route("/api/faculty", get(faculty::list_faculty))
        .route("/api/faculty/import.jsonl", post(faculty::import_jsonl))
        .route("/api/faculty/export.jsonl", get(faculty::export_jsonl))
        .route("/api/faculty/search/{query}", get(faculty::search))
        .route("/api/faculty/{id}", get(faculty::get_faculty))
        .route("/api/faculty/{id}/publications", get(faculty::list_publications))
        .route("/api/analytics/research", get(analytics::research))
        .route("/api/analytics/research-areas", get(analytics::research_areas))
        .route("/api/assistant/message", post(assistant::message))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me).put(auth::update_me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "message": "API is running" }))
}
