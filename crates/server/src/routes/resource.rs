//! Handler bodies shared by every resource route.

use axum::http::StatusCode;
use axum::Json;
use models::query::ListFilter;
use serde::{Deserialize, Serialize};
use service::pagination::{Page, Pagination};
use service::resource::{Resource, ResourceRepository, ResourceService};

use crate::errors::JsonApiError;

/// Query string accepted by list endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring over the searchable fields.
    pub search: Option<String>,
    /// Exact category match (`country` for customers).
    #[serde(alias = "country")]
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
    pub id: i32,
}

pub async fn list<T: Resource, R: ResourceRepository<T>>(
    svc: &ResourceService<T, R>,
    q: ListQuery,
) -> Result<Json<Page<T::Record>>, JsonApiError> {
    let filter = ListFilter::new(q.search, q.category);
    Ok(Json(svc.list(filter, Pagination::new(q.limit, q.offset)).await?))
}

pub async fn get<T: Resource, R: ResourceRepository<T>>(
    svc: &ResourceService<T, R>,
    id: i32,
) -> Result<Json<T::Record>, JsonApiError> {
    Ok(Json(svc.get(id).await?))
}

pub async fn create<T: Resource, R: ResourceRepository<T>>(
    svc: &ResourceService<T, R>,
    input: T::Input,
) -> Result<(StatusCode, Json<T::Record>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(svc.create(input).await?)))
}

pub async fn update<T: Resource, R: ResourceRepository<T>>(
    svc: &ResourceService<T, R>,
    id: i32,
    input: T::Input,
) -> Result<Json<T::Record>, JsonApiError> {
    Ok(Json(svc.update(id, input).await?))
}

pub async fn delete<T: Resource, R: ResourceRepository<T>>(
    svc: &ResourceService<T, R>,
    id: i32,
) -> Result<Json<Deleted>, JsonApiError> {
    let id = svc.delete(id).await?;
    Ok(Json(Deleted { message: format!("{} deleted successfully", T::LABEL), id }))
}
