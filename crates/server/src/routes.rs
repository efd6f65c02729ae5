use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::auth::{require_admin, require_bearer_token, require_manager};
use crate::errors::JsonApiError;
use crate::observability;
use crate::state::AppState;

pub mod auth;
pub mod customers;
pub mod products;
pub mod resource;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn not_found() -> JsonApiError {
    JsonApiError::not_found("Route not found")
}

/// A known path hit with an unregistered method answers like an unknown path.
async fn method_not_allowed_as_not_found(res: Response) -> Response {
    if res.status() == StatusCode::METHOD_NOT_ALLOWED {
        return JsonApiError::not_found("Route not found").into_response();
    }
    res
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    Json(crate::openapi::ApiDoc::openapi())
}

/// Build the full application router: public, token-protected and
/// role-gated routes plus the 404 fallback.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let manager_only = middleware::from_fn(require_manager);

    // Public routes
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(observability::metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    // Routes needing a valid token; some methods additionally need a role
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/users", get(auth::list_users).route_layer(middleware::from_fn(require_admin)))
        .route("/api/customers", get(customers::list).post(customers::create))
        .route(
            "/api/customers/:id",
            get(customers::get)
                .put(customers::update)
                .merge(delete(customers::delete).route_layer(manager_only.clone())),
        )
        .route(
            "/api/products",
            get(products::list).merge(post(products::create).route_layer(manager_only.clone())),
        )
        .route(
            "/api/products/:id",
            get(products::get).merge(
                put(products::update)
                    .delete(products::delete)
                    .route_layer(manager_only),
            ),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token));

    public
        .merge(protected)
        .route_layer(middleware::from_fn(observability::track_metrics))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::map_response(method_not_allowed_as_not_found))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
