// handlers/mod.rs - HTTP handlers by security tier
//
// Public (no auth) -> Protected (session JWT issued by /auth/login)
pub mod public;
pub mod protected;

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Map, Value};

use crate::app::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Admin Panel",
            "version": version,
            "endpoints": {
                "login": "/auth/login (public)",
                "whoami": "/api/auth/whoami (protected)",
                "models": "/api/admin/models (protected)",
                "records": "/api/admin/:model[/:id] (protected)",
                "schedule": "/api/notification/schedule (protected)",
                "health": "/health (public)",
            }
        }
    }))
}

/// GET /health - status of every configured database
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();
    let results = state.databases.health_check().await;

    let mut databases = Map::new();
    let mut healthy = true;
    for (target, result) in results {
        let status = match result {
            Ok(()) => "ok".to_string(),
            Err(e) => {
                healthy = false;
                e.to_string()
            }
        };
        databases.insert(target.to_string(), Value::String(status));
    }

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "success": healthy,
            "data": {
                "status": if healthy { "ok" } else { "degraded" },
                "timestamp": now,
                "databases": databases,
            }
        })),
    )
}
