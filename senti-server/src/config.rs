//! Command line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use senti_types::{ServiceConfig, MIN_TEXT_CHARS};

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "senti_server=info,senti_core=info";

#[derive(Parser, Debug, Clone)]
#[command(name = "senti-server")]
#[command(about = "Sentiment prediction HTTP service", long_about = None, version)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "SENTI_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "SENTI_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Path to the JSON model artifact (vectorizer + classifier)
    #[arg(short, long, env = "SENTI_MODEL", default_value = "modelo_sentimento.json")]
    pub model: PathBuf,

    /// Minimum trimmed length of an accepted text, in characters
    #[arg(long, env = "SENTI_MIN_TEXT_CHARS", default_value_t = MIN_TEXT_CHARS)]
    pub min_text_chars: usize,

    /// Number of HTTP worker threads (defaults to the number of CPUs)
    #[arg(short, long, env = "SENTI_WORKERS")]
    pub workers: Option<usize>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "SENTI_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

impl ServerConfig {
    /// Prediction service settings derived from the command line.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            min_text_chars: self.min_text_chars,
            ..ServiceConfig::default()
        }
    }
}
