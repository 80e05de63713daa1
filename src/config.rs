//! Service configuration, read from the environment (and `.env` when present).

use anyhow::{Context, Result};
use validator::Validate;

#[derive(Debug, Clone, Validate)]
pub struct Config {
    #[validate(length(min = 1))]
    pub database_url: String,
    #[validate(range(min = 1, max = 100))]
    pub max_connections: u32,
    pub port: u16,
    #[validate(url)]
    pub nats_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().with_context(|| format!("Invalid DATABASE_MAX_CONNECTIONS: {}", v))?,
            None => 10,
        };
        let port = match lookup("PORT") {
            Some(v) => v.parse().with_context(|| format!("Invalid PORT: {}", v))?,
            None => 8083,
        };
        let nats_url = lookup("NATS_URL").filter(|u| !u.trim().is_empty());

        let config = Self { database_url, max_connections, port, nats_url };
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    pub fn listen_addr(&self) -> String { format!("0.0.0.0:{}", self.port) }
}
