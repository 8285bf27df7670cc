use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Atelier API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Workshop attendance console for membership programs",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "dashboard": "/api/dashboard",
            "workshops": "/api/workshops"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
