use std::{fmt::Display, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use tracing::info;

pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub giphy_api_key: String,
    pub giphy_search_url: String,
    pub giphy_timeout: Duration,
    pub session_ttl: time::Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn load() -> anyhow::Result<Self> {
        if dotenv::dotenv().is_ok() {
            info!("Loaded .env");
        }

        Ok(Self {
            database_url: try_load("DATABASE_URL", "sqlite://gifstash.db")?,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8080")?,
            giphy_api_key: dotenv::var("GIPHY_API_KEY")
                .map_err(|_| anyhow!("GIPHY_API_KEY must be set"))?,
            giphy_search_url: try_load("GIPHY_SEARCH_URL", "https://api.giphy.com/v1/gifs/search")?,
            giphy_timeout: Duration::from_secs(try_load("GIPHY_TIMEOUT_SECS", "10")?),
            session_ttl: time::Duration::minutes(try_load("SESSION_TTL_MINUTES", "60")?),
            bcrypt_cost: try_load("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let value = dotenv::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value
        .parse()
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("invalid {key} value {value:?}"))
}
