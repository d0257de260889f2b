use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - service name and version
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Shop API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "categories": "/categories[/:id[/products]]",
                "products": "/products[?cat=&minPrice=&maxPrice=&color=] | /products/:id",
                "profile": "/profile (authenticated)",
            }
        }
    }))
}

/// GET /health - database round trip
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.db.health_check().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }
    })))
}
