//! Service layer: business rules for accounts, sessions and resource CRUD.
//! - Separates business logic from data access through repository traits.
//! - Reuses validation and entity definitions in the `models` crate.

pub mod auth;
pub mod errors;
pub mod pagination;
pub mod resource;
pub mod seed;
#[cfg(test)]
pub mod test_support;
