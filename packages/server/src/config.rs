//! Server configuration from environment variables
//!
//! - `HOST` (default `0.0.0.0`)
//! - `PORT` (default `8000`)
//! - `DATABASE_PATH` (default `./data/event-planner.db`)
//! - `CORS_ORIGIN` (optional; any origin is allowed when unset)

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_PATH: &str = "./data/event-planner.db";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub cors_origin: Option<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = non_blank("HOST").unwrap_or(defaults.host);

        let port = match non_blank("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT: {}", raw))?,
            None => defaults.port,
        };

        let database_path = non_blank("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let cors_origin = match non_blank("CORS_ORIGIN") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS_ORIGIN - must be valid HTTP origin: {}", raw))?,
            ),
            None => None,
        };

        Ok(Self {
            host,
            port,
            database_path,
            cors_origin,
        })
    }

    /// `host:port` to bind
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
