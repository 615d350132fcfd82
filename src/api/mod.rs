pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Auth routes
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        // API routes
        .nest("/api", api_routes(app_state.clone()))
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/families", family_routes(state))
}

fn family_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::families::create))
        .route("/", get(handlers::families::list))
        .route("/:family_id", get(handlers::families::get))
        .route("/:family_id", put(handlers::families::update))
        // Members
        .route("/:family_id/members", get(handlers::members::list))
        .route("/:family_id/members", post(handlers::members::register_manual))
        .route("/:family_id/members/:member_id", get(handlers::members::get))
        .route("/:family_id/members/:member_id", put(handlers::members::update_info))
        .route("/:family_id/members/:member_id/role", put(handlers::members::change_role))
        .route("/:family_id/members/:member_id/status", put(handlers::members::change_status))
        // Join requests
        .route("/:family_id/join-requests", post(handlers::join_requests::submit))
        .route("/:family_id/join-requests", get(handlers::join_requests::list))
        .route("/:family_id/join-requests/:request_id", patch(handlers::join_requests::process))
        // Relationships
        .route(
            "/:family_id/members/:member_id/relationships",
            post(handlers::relationships::upsert),
        )
        .route(
            "/:family_id/members/:member_id/relationships",
            get(handlers::relationships::list_from),
        )
        .route(
            "/:family_id/members/:member_id/relationships/:to_member_id",
            get(handlers::relationships::get),
        )
        // Family tree
        .route("/:family_id/members/:member_id/tree", get(handlers::tree::get))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}
