use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use todolist_rest::config::AppConfig;
use todolist_rest::{SharedData, app_router, db, logging, persistence};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if dotenv().is_err() {
        println!("Running without a .env file.");
    }

    let config = AppConfig::from_env().context("reading configuration")?;
    let otel_exporters = match config.otel {
        Some(ref endpoints) => Some(logging::init_exporters(endpoints)?),
        None => None,
    };
    logging::setup_logging_and_tracing(
        logging::init_env_filter(config.db.log_queries)?,
        otel_exporters.as_ref(),
    );

    let serve_result = serve(&config).await;
    if let Err(ref err) = serve_result {
        error!("Server stopped with an error: {err:#}");
    }

    if let Some(exporters) = otel_exporters {
        exporters.shutdown();
    }
    serve_result
}

/// Connects to the database, then serves HTTP until Ctrl-C is received
async fn serve(config: &AppConfig) -> Result<(), anyhow::Error> {
    let db_pool = db::connect_sqlx(&config.db).await?;
    db::run_migrations(&db_pool).await?;

    let ext_cxn = persistence::ExternalConnectivity::new(db_pool);
    let shared_data = Arc::new(SharedData {
        ext_cxn: ext_cxn.clone(),
    });

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding to {}", config.listen_addr))?;
    info!("Starting server on {}.", config.listen_addr);

    let serve_result = axum::serve(listener, app_router(shared_data))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP");

    info!("Closing database connections.");
    ext_cxn.close().await;
    serve_result
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C, shutting down: {err}");
    }
}
