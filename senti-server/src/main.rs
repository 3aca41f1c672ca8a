//! Sentiment prediction HTTP service.
//!
//! Loads the model artifact once, then serves `POST /predict` and
//! `GET /health` with permissive CORS. A missing or invalid artifact does not
//! stop the process: predictions answer 503 until it is restarted with a
//! valid one.

mod config;
mod routes;

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use senti_core::{ModelContext, PredictionService};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServerConfig;

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

#[actix_web::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_tracing(&config.log_filter);

    let context = ModelContext::load(&config.model);
    if !context.is_loaded() {
        warn!(model = %config.model.display(), "serving without a model, /predict will answer 503");
    }

    let service = web::Data::new(PredictionService::with_config(
        context,
        config.service_config(),
    ));

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .app_data(service.clone())
            .configure(routes::configure)
    });

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    info!(host = %config.host, port = config.port, "listening");

    server
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    Ok(())
}
