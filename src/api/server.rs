//! HTTP server lifecycle: bind, spawn, graceful shutdown.
//!
//! Pattern: bind → spawn background task → return a handle with a
//! shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::config::Config;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Bind the given address and serve the API router in a background task.
pub async fn start_server(
    config: Arc<Config>,
    addr: SocketAddr,
) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server: {e}"))?;
    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = api_router(config);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    use crate::auth;

    fn test_config(data_dir: &std::path::Path) -> Arc<Config> {
        Arc::new(Config {
            port: 0,
            data_dir: data_dir.to_path_buf(),
            token_secret: "test-signing-secret".into(),
            admin_email: "admin@example.com".into(),
            admin_password: "admin123".into(),
            admin_name: "Admin User".into(),
        })
    }

    async fn start_test_server(
        config: Arc<Config>,
    ) -> ApiServer {
        std::fs::create_dir_all(config.uploads_dir()).unwrap();
        start_server(
            config,
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
        )
        .await
        .expect("server should start")
    }

    #[tokio::test]
    async fn serves_health_over_the_wire() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = start_test_server(test_config(tmp.path())).await;

        let url = format!("http://{}/api/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");

        server.shutdown();
    }

    #[tokio::test]
    async fn rejects_unauthenticated_document_access() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = start_test_server(test_config(tmp.path())).await;

        let url = format!("http://{}/api/documents", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

        server.shutdown();
    }

    #[tokio::test]
    async fn login_works_over_the_wire() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        {
            let conn = crate::db::open_database(&config.db_path()).unwrap();
            auth::bootstrap_admin(&conn, &config.admin_seed()).unwrap();
        }
        let mut server = start_test_server(config).await;

        let url = format!("http://{}/api/auth/login", server.addr);
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&serde_json::json!({
                "email": "admin@example.com",
                "password": "admin123"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = resp.json().await.unwrap();
        assert!(!json["token"].as_str().unwrap().is_empty());

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = start_test_server(test_config(tmp.path())).await;

        server.shutdown();
        server.shutdown();
    }
}
