//! Generic CRUD over record types that share one shape: a required name,
//! optional descriptive fields and at most one store-enforced unique field.

pub mod customer;
pub mod product;
pub mod repository;
pub mod service;

use models::errors::ModelError;
use serde::Serialize;

pub use repository::ResourceRepository;
pub use service::ResourceService;

/// Describes one resource type to the generic service.
pub trait Resource: Send + Sync + 'static {
    /// Row as returned to callers.
    type Record: Clone + Send + Sync + Serialize;
    /// Raw create/update payload.
    type Input: Send;
    /// Payload after validation; the only thing repositories accept.
    type Fields: Clone + Send + Sync;

    /// Singular name used in logs.
    const NAME: &'static str;
    /// Capitalised name used in caller-facing messages.
    const LABEL: &'static str;
    /// Message for a unique-constraint conflict.
    const DUPLICATE_MESSAGE: &'static str;

    fn validate(input: Self::Input) -> Result<Self::Fields, ModelError>;
}
