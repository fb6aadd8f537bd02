use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracker_repo::HealthCheck;
use tracing::warn;

#[get("/health")]
pub async fn health(health_check: web::Data<Arc<dyn HealthCheck>>) -> impl Responder {
    if health_check.check().await {
        HttpResponse::Ok().body("OK")
    } else {
        warn!("Health check failed");
        HttpResponse::ServiceUnavailable().body("Unavailable")
    }
}
