//! Database entities, validation helpers and the connection factory shared by
//! the service and server crates.

pub mod errors;
pub mod db;
pub mod validation;
pub mod query;
pub mod account;
pub mod customer;
pub mod product;

#[cfg(test)]
mod tests;
