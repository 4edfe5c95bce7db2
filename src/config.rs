use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub questionnaire_path: PathBuf,
    pub enable_cors: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let bind_raw = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid BIND_ADDR: {}", bind_raw))?;

        let questionnaire_path = dotenv::var("QUESTIONNAIRE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("questions.md"));

        let enable_cors = match dotenv::var("ENABLE_CORS") {
            Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "invalid ENABLE_CORS, using true");
                true
            }),
            Err(_) => true,
        };

        Ok(Self {
            bind_addr,
            questionnaire_path,
            enable_cors,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
