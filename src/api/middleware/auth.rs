//! Bearer-token authentication and role authorization middleware.
//!
//! `authenticate` extracts `Authorization: Bearer <token>`, validates it,
//! resolves the embedded id to a live principal, and injects a typed
//! [`AuthedUser`] into request extensions. `require_role` then checks the
//! attached principal against an allowed-role set.

use std::future::Future;
use std::pin::Pin;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::auth;
use crate::db::repository;
use crate::models::Role;

/// Require a valid bearer token and resolve it to a principal.
///
/// Accesses `ApiContext` from request extensions (injected by the
/// Extension layer on the router).
pub async fn authenticate(req: Request<Body>, next: Next) -> Response {
    match authenticate_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn authenticate_inner(
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::NoTokenProvided)?
        .to_string();

    let claims = auth::verify_token(&ctx.config.token_secret, &token)?;
    let id = Uuid::parse_str(&claims.id).map_err(|_| ApiError::InvalidToken)?;

    // The token may outlive the account; only a live principal passes.
    let conn = ctx.open_db()?;
    let user = repository::get_user(&conn, &id)?.ok_or(ApiError::UserNotFound)?;

    req.extensions_mut().insert(AuthedUser {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    });

    Ok(next.run(req).await)
}

/// Middleware requiring the attached principal's role to be one of
/// `allowed`. Rejects with 401 when no principal is attached (the
/// authenticate stage did not run or did not pass), 403 on a role miss.
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(Request<Body>, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |req, next| Box::pin(authorize(allowed, req, next))
}

async fn authorize(allowed: &'static [Role], req: Request<Body>, next: Next) -> Response {
    let Some(user) = req.extensions().get::<AuthedUser>() else {
        return ApiError::NotAuthorized.into_response();
    };
    if !allowed.contains(&user.role) {
        return ApiError::Forbidden.into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    fn principal(role: Role) -> AuthedUser {
        AuthedUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            name: "Someone".into(),
            role,
        }
    }

    /// Router with `require_role` plus a layer that plants the given
    /// principal, standing in for a passed authenticate stage.
    fn role_gated_router(allowed: &'static [Role], user: Option<AuthedUser>) -> Router {
        let router = Router::new()
            .route("/t", get(ok_handler))
            .layer(axum::middleware::from_fn(require_role(allowed)));

        match user {
            Some(user) => router.layer(axum::middleware::from_fn(
                move |mut req: Request<Body>, next: Next| {
                    let user = user.clone();
                    async move {
                        req.extensions_mut().insert(user);
                        next.run(req).await
                    }
                },
            )),
            None => router,
        }
    }

    async fn status_for(router: Router) -> StatusCode {
        let req = Request::builder().uri("/t").body(Body::empty()).unwrap();
        router.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn admin_only_rejects_editor_with_403() {
        let router = role_gated_router(&[Role::Admin], Some(principal(Role::Editor)));
        assert_eq!(status_for(router).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn editor_passes_when_listed() {
        let router =
            role_gated_router(&[Role::Admin, Role::Editor], Some(principal(Role::Editor)));
        assert_eq!(status_for(router).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_passes_admin_gate() {
        let router = role_gated_router(&[Role::Admin], Some(principal(Role::Admin)));
        assert_eq!(status_for(router).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_principal_is_401() {
        let router = role_gated_router(&[Role::Admin], None);
        assert_eq!(status_for(router).await, StatusCode::UNAUTHORIZED);
    }
}
