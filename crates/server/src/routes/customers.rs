use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::customer;
use service::pagination::Page;
use service::resource::customer::CustomerInput;

use super::resource::{self, Deleted, ListQuery};
use crate::errors::JsonApiError;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/customers", tag = "customers",
    params(ListQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of customers with total"),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<customer::Model>>, JsonApiError> {
    let Query(q) = query?;
    resource::list(&state.customers, q).await
}

#[utoipa::path(
    get, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<customer::Model>, JsonApiError> {
    let Path(id) = id?;
    resource::get(&state.customers, id).await
}

#[utoipa::path(
    post, path = "/api/customers", tag = "customers",
    request_body = crate::openapi::CustomerRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation error or email already exists")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> Result<(StatusCode, Json<customer::Model>), JsonApiError> {
    let Json(input) = payload?;
    resource::create(&state.customers, input).await
}

#[utoipa::path(
    put, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = crate::openapi::CustomerRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation error or email already exists"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> Result<Json<customer::Model>, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    resource::update(&state.customers, id, input).await
}

#[utoipa::path(
    delete, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer ID")),
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
    resource::delete(&state.customers, id).await
}
