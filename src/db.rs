use crate::config::DbSettings;
use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Opens a connection pool to PostgreSQL. The pool establishes its first connection before
/// returning, so an unreachable database fails here rather than on the first request.
pub async fn connect_sqlx(settings: &DbSettings) -> Result<PgPool, anyhow::Error> {
    let mut connect_options =
        PgConnectOptions::from_str(&settings.url).context("parsing the database URL")?;
    if !settings.log_queries {
        connect_options = connect_options.disable_statement_logging();
    }

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(2))
        .connect_with(connect_options)
        .await
        .context("connecting to the database")?;

    info!(
        max_connections = settings.max_connections,
        log_queries = settings.log_queries,
        "Connected to database"
    );
    Ok(pool)
}

/// Brings the schema up to date using the migrations embedded from the "migrations" directory
pub async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    sqlx::migrate!()
        .run(pool)
        .await
        .context("applying database migrations")?;

    Ok(())
}
