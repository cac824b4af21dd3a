use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,

    /// Register the hook that marks new employees Absent for today.
    pub seed_absent_on_create: bool,

    // Rate limiting, requests per minute per peer IP; 0 disables.
    pub rate_write_per_min: u32,
    pub rate_read_per_min: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),
            api_prefix: var_or("API_PREFIX", "/api"),
            log_dir: var_or("LOG_DIR", "logs"),
            seed_absent_on_create: parse_or("SEED_ABSENT_ON_CREATE", true)?,
            rate_write_per_min: parse_or("RATE_WRITE_PER_MIN", 120)?,
            rate_read_per_min: parse_or("RATE_READ_PER_MIN", 1000)?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{key} has invalid value '{raw}'"))
}
