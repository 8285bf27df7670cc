pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::get,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::service::ServiceContext;
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>) -> Router {
    let app_state = AppState::new(service_context);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // API routes
        .nest("/api", api_routes())

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::dashboard::show))
        .nest("/workshops", workshop_routes())
}

fn workshop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::workshops::list).post(handlers::workshops::create))
        .route("/:id", get(handlers::workshops::get).delete(handlers::workshops::delete))
        .route(
            "/:id/attendance",
            get(handlers::attendance::roster).post(handlers::attendance::commit),
        )
}
