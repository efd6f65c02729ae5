use std::marker::PhantomData;
use std::sync::Arc;

use models::query::ListFilter;
use tracing::{error, info, instrument};

use super::{Resource, ResourceRepository};
use crate::errors::{ServiceError, StoreError};
use crate::pagination::{Page, Pagination};

/// Application service applying validation and error mapping on top of a
/// resource repository.
pub struct ResourceService<T: Resource, R: ResourceRepository<T>> {
    repo: Arc<R>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource, R: ResourceRepository<T>> Clone for ResourceService<T, R> {
    fn clone(&self) -> Self { Self { repo: self.repo.clone(), _resource: PhantomData } }
}

impl<T: Resource, R: ResourceRepository<T>> ResourceService<T, R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo, _resource: PhantomData } }

    fn store_error(err: StoreError) -> ServiceError {
        match err {
            StoreError::UniqueViolation => ServiceError::Duplicate(T::DUPLICATE_MESSAGE.to_string()),
            StoreError::Db(msg) => {
                error!(resource = T::NAME, error = %msg, "store failure");
                ServiceError::Db(msg)
            }
        }
    }

    #[instrument(skip(self), fields(resource = T::NAME))]
    pub async fn list(&self, filter: ListFilter, page: Pagination) -> Result<Page<T::Record>, ServiceError> {
        let (limit, offset) = page.normalize()?;
        let (items, total) = self.repo.list(&filter, limit, offset).await.map_err(Self::store_error)?;
        Ok(Page { items, total, limit, offset })
    }

    #[instrument(skip(self), fields(resource = T::NAME))]
    pub async fn get(&self, id: i32) -> Result<T::Record, ServiceError> {
        self.repo
            .get(id)
            .await
            .map_err(Self::store_error)?
            .ok_or_else(|| ServiceError::not_found(T::LABEL))
    }

    #[instrument(skip(self, input), fields(resource = T::NAME))]
    pub async fn create(&self, input: T::Input) -> Result<T::Record, ServiceError> {
        let fields = T::validate(input)?;
        let record = self.repo.insert(fields).await.map_err(Self::store_error)?;
        info!(resource = T::NAME, "created");
        Ok(record)
    }

    #[instrument(skip(self, input), fields(resource = T::NAME))]
    pub async fn update(&self, id: i32, input: T::Input) -> Result<T::Record, ServiceError> {
        let fields = T::validate(input)?;
        let record = self
            .repo
            .update(id, fields)
            .await
            .map_err(Self::store_error)?
            .ok_or_else(|| ServiceError::not_found(T::LABEL))?;
        info!(resource = T::NAME, id, "updated");
        Ok(record)
    }

    /// Returns the deleted id.
    #[instrument(skip(self), fields(resource = T::NAME))]
    pub async fn delete(&self, id: i32) -> Result<i32, ServiceError> {
        if !self.repo.delete(id).await.map_err(Self::store_error)? {
            return Err(ServiceError::not_found(T::LABEL));
        }
        info!(resource = T::NAME, id, "deleted");
        Ok(id)
    }
}
