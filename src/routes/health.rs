use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Liveness check. Public, touches neither the store nor the session registry.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Service is up",
        "status": "ok",
        "timestamp": Utc::now()
    }))
}
