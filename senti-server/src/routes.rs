//! HTTP routes.

use std::time::Instant;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use senti_core::{PredictionService, Reply};
use serde_json::{json, Value};
use tracing::{error, info};

/// Allows any origin, method and header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

/// Registers `POST /predict` and `GET /health`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/health").route(web::get().to(health)));
}

fn to_response(reply: Reply) -> HttpResponse {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(reply.body)
}

/// Classifies the `text` field of a JSON body.
///
/// A body that is not valid JSON is treated as absent.
pub async fn predict(service: web::Data<PredictionService>, body: web::Bytes) -> HttpResponse {
    let start = Instant::now();
    let parsed: Option<Value> = serde_json::from_slice(&body).ok();

    let worker = service.clone();
    let reply = match web::block(move || worker.respond(parsed.as_ref())).await {
        Ok(reply) => reply,
        Err(err) => {
            error!(error = ?err, "prediction task failed");
            Reply {
                status: 500,
                body: json!({ "erro": err.to_string() }),
            }
        }
    };

    info!(
        status = reply.status,
        elapsed_us = start.elapsed().as_micros() as u64,
        "POST /predict"
    );

    to_response(reply)
}

/// Reports whether the model is loaded, plus request counters.
pub async fn health(service: web::Data<PredictionService>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "modelo": service.is_ready(),
        "stats": service.stats(),
    }))
}
