//! Domain layer - Pure business abstractions
//!
//! This layer contains NO web framework dependencies (no Axum).
//! Only trait definitions, response/input types, validators and error types.

pub mod errors;
pub mod repositories;
pub mod validation;

pub use errors::DomainError;
pub use repositories::*;
