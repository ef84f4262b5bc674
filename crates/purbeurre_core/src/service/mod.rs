//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations callers need.
//! - Keep front ends decoupled from storage details.

pub mod profile_service;
pub mod quota_service;
pub mod substitute_service;

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// No user with this username.
    UserNotFound(String),
    /// No product with this ref.
    ProductNotFound(String),
    /// Storage is over its row cap and no product could be evicted.
    QuotaExceeded { rows: u64, row_cap: u64 },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotFound(username) => write!(f, "user not found: {username}"),
            Self::ProductNotFound(reference) => write!(f, "product not found: {reference}"),
            Self::QuotaExceeded { rows, row_cap } => write!(
                f,
                "storage quota exceeded: {rows} rows over cap {row_cap} and nothing to evict"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "product",
                key,
            } => Self::ProductNotFound(key),
            RepoError::NotFound { entity: "user", key } => Self::UserNotFound(key),
            other => Self::Repo(other),
        }
    }
}
