//! HTTP API layer.
//!
//! Exposes the document lifecycle and credential services as axum
//! endpoints nested under `/api/`, guarded by the bearer-token auth gate.
//! The router is composable; `api_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;
pub mod upload;

pub use router::api_router;
pub use server::ApiServer;
pub use types::ApiContext;
