//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. Document routes sit behind the auth
//! gate (authenticate, then role check); login and health are public.
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost
//! layer), endpoint handlers use `State<ApiContext>`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::{Config, MAX_UPLOAD_BYTES};
use crate::models::Role;

const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Headroom over the upload cap for multipart framing; the parser's own
/// size check produces the classified response.
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Build the API router for the given configuration.
pub fn api_router(config: Arc<Config>) -> Router {
    build_router(ApiContext::new(config))
}

fn build_router(ctx: ApiContext) -> Router {
    // Layers are applied bottom (innermost) to top (outermost):
    //   Extension → body limit → authenticate → require_role → handler
    let protected = Router::new()
        .route(
            "/documents",
            get(endpoints::documents::list).post(endpoints::documents::upload_document),
        )
        .route(
            "/documents/:id",
            get(endpoints::documents::metadata).delete(endpoints::documents::delete),
        )
        .route(
            "/documents/:id/extractions",
            get(endpoints::documents::extractions),
        )
        .route("/documents/:id/file", get(endpoints::documents::file))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_role(
            ADMIN_ONLY,
        )))
        .layer(axum::middleware::from_fn(middleware::auth::authenticate))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(axum::Extension(ctx.clone()));

    let public = Router::new()
        .route("/auth/login", post(endpoints::auth::login))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx.clone())
        .layer(axum::Extension(ctx));

    Router::new()
        .nest("/api", protected)
        .nest("/api", public)
        .layer(CorsLayer::permissive())
}
