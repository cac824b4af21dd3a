use actix_web::{HttpResponse, Responder, get};
use serde_json::json;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "ok",
            "message": "HRM Lite backend is running"
        }))
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "HRM Lite backend is running"
    }))
}
