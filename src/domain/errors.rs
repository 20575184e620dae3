//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or malformed input
    #[error("{0}")]
    BadRequest(String),
    /// A requested or referenced resource does not exist
    #[error("{0}")]
    NotFound(String),
    /// Uniqueness violation or a referential guard refusing the operation
    #[error("{0}")]
    Conflict(String),
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// `NotFound` for a missing entity, e.g. "Customer not found"
    pub fn not_found(entity: &str) -> Self {
        DomainError::NotFound(format!("{} not found", entity))
    }
}

// Constraint violations raised by the store itself (e.g. two concurrent creates
// passing the same uniqueness pre-check) surface as Conflict, not as a crash.
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                DomainError::Conflict(format!("Unique constraint violated: {}", detail))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                DomainError::Conflict(format!("Resource is still referenced: {}", detail))
            }
            _ => DomainError::Database(e.to_string()),
        }
    }
}
