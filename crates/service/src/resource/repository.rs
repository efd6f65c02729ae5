use async_trait::async_trait;
use models::query::ListFilter;

use super::Resource;
use crate::errors::StoreError;

/// Store operations for one resource type. Each mutation is one statement.
#[async_trait]
pub trait ResourceRepository<T: Resource>: Send + Sync {
    /// One page plus the total number of rows matching `filter`.
    async fn list(&self, filter: &ListFilter, limit: u64, offset: u64) -> Result<(Vec<T::Record>, u64), StoreError>;
    async fn get(&self, id: i32) -> Result<Option<T::Record>, StoreError>;
    async fn insert(&self, fields: T::Fields) -> Result<T::Record, StoreError>;
    /// `None` when no row has this id.
    async fn update(&self, id: i32, fields: T::Fields) -> Result<Option<T::Record>, StoreError>;
    /// `false` when no row has this id.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}
