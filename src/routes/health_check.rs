//! src/routes/health_check.rs
use crate::messaging::MessagingGateway;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    whatsapp: &'static str,
}

/// Liveness of the service, with the state of the messaging session for operators.
pub async fn health_check(gateway: web::Data<dyn MessagingGateway>) -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "ok",
        whatsapp: gateway.state().as_str(),
    })
}
