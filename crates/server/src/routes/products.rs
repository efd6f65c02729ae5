use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::product;
use service::pagination::Page;
use service::resource::product::ProductInput;

use super::resource::{self, Deleted, ListQuery};
use crate::errors::JsonApiError;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/products", tag = "products",
    params(ListQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of products with total"),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<product::Model>>, JsonApiError> {
    let Query(q) = query?;
    resource::list(&state.products, q).await
}

#[utoipa::path(
    get, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<product::Model>, JsonApiError> {
    let Path(id) = id?;
    resource::get(&state.products, id).await
}

#[utoipa::path(
    post, path = "/api/products", tag = "products",
    request_body = crate::openapi::ProductRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation error or sku already exists"),
        (status = 403, description = "Admin or manager role required")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<product::Model>), JsonApiError> {
    let Json(input) = payload?;
    resource::create(&state.products, input).await
}

#[utoipa::path(
    put, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = crate::openapi::ProductRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation error or sku already exists"),
        (status = 403, description = "Admin or manager role required"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<product::Model>, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    resource::update(&state.products, id, input).await
}

#[utoipa::path(
    delete, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Admin or manager role required"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Deleted>, JsonApiError> {
    let Path(id) = id?;
    resource::delete(&state.products, id).await
}
