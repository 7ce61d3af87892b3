use axum::response::Json;
use serde_json::json;

/// GET /health、/api/health —— 固定存活状态，无失败分支
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "service": env!("CARGO_PKG_NAME"),
    }))
}
