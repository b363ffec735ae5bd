//! Process configuration loaded once at startup.

use anyhow::{Context, Result};
use std::{env, fmt};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: i64,
    pub server_addr: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("max_connections", &self.max_connections)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expires_in_seconds", &self.jwt_expires_in_seconds)
            .field("server_addr", &self.server_addr)
            .finish()
    }
}

impl Config {
    /// Loads configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = var_or("DATABASE_URL", "sqlite://bank.db?mode=rwc");

        let max_connections = var_or("DB_MAX_CONNECTIONS", "5")
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET not set")?;

        let jwt_expires_in_seconds = var_or("JWT_EXPIRES_IN_SECONDS", "86400")
            .parse::<i64>()
            .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;

        let server_addr = var_or("SERVER_ADDR", "0.0.0.0:3000");

        Ok(Config {
            database_url,
            max_connections,
            jwt_secret,
            jwt_expires_in_seconds,
            server_addr,
        })
    }
}
