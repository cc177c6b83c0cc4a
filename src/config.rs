use crate::app_env;
use anyhow::{Context, anyhow};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

/// Settings used when constructing the database connection pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub url: String,
    pub max_connections: u32,
    /// Emit every executed SQL statement through sqlx's statement logger
    pub log_queries: bool,
}

/// Endpoints for OpenTelemetry exporters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtelEndpoints {
    pub spans: String,
    pub metrics: String,
}

/// Everything the service reads from its environment at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub db: DbSettings,
    /// Present only when both export URLs are configured
    pub otel: Option<OtelEndpoints>,
}

impl AppConfig {
    /// Reads configuration from the process environment. Call `dotenv()` first if
    /// values should also come from a .env file.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup so tests don't have to
    /// mutate the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let url = lookup(app_env::DB_URL).ok_or_else(|| {
            anyhow!(
                "{} must be set to a PostgreSQL connection string",
                app_env::DB_URL
            )
        })?;

        let listen_addr = parse_or(&lookup, app_env::LISTEN_ADDR, || {
            SocketAddr::from(([127, 0, 0, 1], 8080))
        })?;
        let max_connections = parse_or(&lookup, app_env::DB_MAX_CONNECTIONS, || {
            DEFAULT_DB_MAX_CONNECTIONS
        })?;
        let log_queries = parse_or(&lookup, app_env::DB_LOG_QUERIES, || false)?;

        let otel = match (
            lookup(app_env::OTEL_SPAN_EXPORT_URL),
            lookup(app_env::OTEL_METRIC_EXPORT_URL),
        ) {
            (Some(spans), Some(metrics)) => Some(OtelEndpoints { spans, metrics }),
            _ => None,
        };

        Ok(AppConfig {
            listen_addr,
            db: DbSettings {
                url,
                max_connections,
                log_queries,
            },
            otel,
        })
    }
}

/// Parses the variable under [key] if it's set, otherwise falls back to [default]
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: impl FnOnce() -> T,
) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default()),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
    }
}
