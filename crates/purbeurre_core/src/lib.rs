//! Core catalog logic for Pur Beurre.
//! Search, substitute lookup, registered-product profiles and storage
//! housekeeping over a SQLite catalog.

pub mod config;
pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId, NewCategory};
pub use model::product::{Nutriscore, Product, ProductDraft, ProductId};
pub use model::profile::{User, UserId};
pub use model::ValidationError;
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use repo::{RepoError, RepoResult};
pub use search::query::clean_query;
pub use search::selection::{ElementKind, SearchSelection, SelectionElement};
pub use service::profile_service::{ProfileService, RegistrationOutcome, RemovalStatus};
pub use service::quota_service::{QuotaService, StorageQuota};
pub use service::substitute_service::SubstituteService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
