mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::ai::TextGenerator;
use crate::db::Database;

pub use handlers::{AiChatRequest, AiChatResponse, ErrorBody, StatsResponse};
use middleware::{auth_middleware, ApiKey};

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub ai: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(db: Database, ai: Arc<dyn TextGenerator>) -> Self {
        Self { db, ai }
    }
}

/// Router without authentication (local use and tests).
pub fn create_router(state: AppState) -> Router {
    create_router_with_auth(state, None)
}

/// Router requiring `Authorization: Bearer <api_key>` on every route except
/// `/health` when `api_key` is set.
pub fn create_router_with_auth(state: AppState, api_key: Option<String>) -> Router {
    let protected = Router::new()
        // Notes
        .route("/notes", get(handlers::list_notes).post(handlers::create_note))
        .route(
            "/notes/{id}",
            get(handlers::get_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
        .route("/notes/{id}/complete", patch(handlers::set_completion))
        // Insights
        .route("/stats", get(handlers::stats))
        .route("/quote", get(handlers::quote))
        // AI
        .route("/ai-chat", post(handlers::ai_chat))
        .route_layer(from_fn_with_state(ApiKey(api_key), auth_middleware));

    let api = protected.route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
