//! Auth module: domain, repository and service layers for accounts and
//! session tokens.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use service::AuthService;
pub use token::{SessionClaims, TokenError, TokenIssuer};
