//! Access control: bearer-token verification and role gates.
//!
//! `require_bearer_token` runs first on every protected route and stores the
//! verified `SessionClaims` in the request extensions; the role gates and the
//! `CurrentUser` extractor read them from there.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use models::account::Role;
use service::auth::SessionClaims;
use tracing::{debug, warn};

use crate::errors::JsonApiError;
use crate::state::AppState;

/// `Authorization: Bearer <token>` value, if well-formed. The scheme is
/// matched case-insensitively.
fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.trim_start().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
}

pub async fn require_bearer_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let Some(token) = bearer_token(&req) else {
        debug!(path = %req.uri().path(), "missing bearer token");
        return Err(JsonApiError::missing_token());
    };
    let claims = state.tokens().verify(token).map_err(|e| {
        warn!(path = %req.uri().path(), error = %e, "token rejected");
        JsonApiError::invalid_token()
    })?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn require_role(req: &Request, allowed: &[Role], denied: &str) -> Result<(), JsonApiError> {
    let claims = req.extensions().get::<SessionClaims>().ok_or_else(JsonApiError::missing_token)?;
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        warn!(account_id = claims.id, role = %claims.role, path = %req.uri().path(), "role not permitted");
        Err(JsonApiError::insufficient_role(denied))
    }
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, JsonApiError> {
    require_role(&req, &[Role::Admin], "Admin access required")?;
    Ok(next.run(req).await)
}

/// Admins and managers.
pub async fn require_manager(req: Request, next: Next) -> Result<Response, JsonApiError> {
    require_role(&req, &[Role::Admin, Role::Manager], "Manager access required")?;
    Ok(next.run(req).await)
}

/// Claims of the authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionClaims);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(JsonApiError::missing_token)
    }
}
