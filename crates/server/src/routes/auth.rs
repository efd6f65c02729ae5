use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use service::auth::domain::{AuthSession, LoginInput, PublicAccount, RegisterInput};

use crate::auth::CurrentUser;
use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub token: String,
    pub user: PublicAccount,
}

impl SessionResponse {
    fn new(message: &'static str, session: AuthSession) -> Self {
        Self { message, token: session.token, user: session.user }
    }
}

#[utoipa::path(
    post, path = "/api/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "Registered"),
        (status = 400, description = "Validation error or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), JsonApiError> {
    let Json(input) = payload?;
    let session = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::new("User registered successfully", session))))
}

#[utoipa::path(
    post, path = "/api/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in"),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<SessionResponse>, JsonApiError> {
    let Json(input) = payload?;
    let session = state.auth.login(input).await?;
    Ok(Json(SessionResponse::new("Login successful", session)))
}

#[utoipa::path(
    get, path = "/api/auth/me", tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current account"),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(State(state): State<AppState>, CurrentUser(claims): CurrentUser) -> Result<Json<PublicAccount>, JsonApiError> {
    Ok(Json(state.auth.who_am_i(claims.id).await?))
}

#[utoipa::path(
    get, path = "/api/auth/users", tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All accounts"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicAccount>>, JsonApiError> {
    Ok(Json(state.auth.list_accounts().await?))
}
