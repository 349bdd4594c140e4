use std::str::FromStr;

use crate::api::error::ConfigError;

pub const UPLOAD_FIELD: &str = "file";
pub const UPLOADS_URL_PREFIX: &str = "/uploads";
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct Env {
    pub database_url: String,
    pub ip: String,
    pub port: u16,
    pub upload_dir: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: u64,
    pub workers: Option<usize>,
}

impl Env {
    pub fn load() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let ip = std::env::var("IP").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_or("PORT", 5000)?;
        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 5)?;
        let db_acquire_timeout = parse_or("DB_ACQUIRE_TIMEOUT", 5)?;
        let workers = match std::env::var("WORKERS") {
            Ok(raw) => Some(parse_value("WORKERS", &raw)?),
            Err(_) => None,
        };

        Ok(Env {
            database_url,
            ip,
            port,
            upload_dir,
            db_max_connections,
            db_acquire_timeout,
            workers,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { key, value: raw.to_string() })
}
