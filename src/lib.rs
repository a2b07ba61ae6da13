pub mod api;
pub mod auth;
pub mod cleanup;
pub mod config;
pub mod db;
pub mod documents;
pub mod extractions;
pub mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Composition root: tracing, configuration, storage migrations, admin
/// bootstrap, one orphan sweep, then the HTTP server until ctrl-c.
pub async fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = Arc::new(Config::from_env());
    std::fs::create_dir_all(config.uploads_dir())
        .map_err(|e| format!("Cannot create uploads directory: {e}"))?;

    // Migrations, the admin account, and the orphan sweep all run on a
    // short-lived startup connection.
    {
        let conn = db::open_database(&config.db_path())
            .map_err(|e| format!("Cannot open database: {e}"))?;
        auth::bootstrap_admin(&conn, &config.admin_seed())
            .map_err(|e| format!("Cannot bootstrap admin account: {e}"))?;
        cleanup::cleanup_orphaned_documents(&conn, &config.uploads_dir());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let mut server = api::server::start_server(config, addr).await?;
    tracing::info!(addr = %server.addr, "Server is running");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Cannot listen for shutdown signal: {e}"))?;
    server.shutdown();

    Ok(())
}
