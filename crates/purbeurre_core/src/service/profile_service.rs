//! Registered-substitute use-case service.
//!
//! # Responsibility
//! - Manage the list of products a user registered.
//! - Store a product on demand when a user registers one the catalog lacks.
//!
//! # Invariants
//! - A new product is only stored after the storage quota allowed it.
//! - Unknown users and products surface as not-found errors, never as
//!   silent no-ops.

use crate::model::product::{Product, ProductDraft, ProductId};
use crate::model::profile::{User, UserId};
use crate::repo::product_repo::ProductRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::RepoError;
use crate::search::selection::SearchSelection;
use crate::service::quota_service::StorageQuota;
use crate::service::{ServiceError, ServiceResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Outcome of removing a product from a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalStatus {
    /// The link is gone.
    Success,
    /// The link still exists after removal.
    Error,
}

/// Outcome of registering a product to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// Product was stored first, then registered.
    Created,
    /// Product was already stored.
    AlreadyStored,
}

/// Profile service facade over repository implementations.
pub struct ProfileService<P: ProductRepository, U: ProfileRepository> {
    products: P,
    profiles: U,
}

impl<P: ProductRepository, U: ProfileRepository> ProfileService<P, U> {
    pub fn new(products: P, profiles: U) -> Self {
        Self { products, profiles }
    }

    /// Creates a profile owner.
    pub fn create_user(&self, username: &str, email: Option<&str>) -> ServiceResult<UserId> {
        let id = self.profiles.create_user(username, email)?;
        info!("event=user_create module=service status=ok user_id={id}");
        Ok(id)
    }

    pub fn check_product_existence(&self, reference: &str) -> ServiceResult<bool> {
        Ok(self.products.product_exists(reference)?)
    }

    /// Stores a product the catalog does not know yet.
    ///
    /// Categories listed in the draft but absent from storage are skipped.
    pub fn set_product_for_user_registration(
        &self,
        draft: &ProductDraft,
    ) -> ServiceResult<ProductId> {
        let id = self.products.create_product(draft)?;
        info!("event=product_create module=service status=ok product_id={id}");
        Ok(id)
    }

    /// Adds a stored product to a user's profile. Saving twice is a no-op.
    pub fn save_product_for_user(&self, username: &str, reference: &str) -> ServiceResult<()> {
        let user = self.require_user(username)?;
        let product = self.require_product(reference)?;
        self.profiles.add_product(user.id, product.id)?;
        info!(
            "event=profile_save module=service status=ok user_id={} product_id={}",
            user.id, product.id
        );
        Ok(())
    }

    /// Returns the user's registered products, or `None` when there are none.
    pub fn get_products_registered(
        &self,
        username: &str,
    ) -> ServiceResult<Option<SearchSelection>> {
        let user = self.require_user(username)?;
        let products = self.profiles.list_products(user.id)?;
        Ok(SearchSelection::non_empty_products(&products))
    }

    /// Removes a product from the user's profile and reports the final state.
    pub fn delete_product_registered(
        &self,
        username: &str,
        reference: &str,
    ) -> ServiceResult<RemovalStatus> {
        let user = self.require_user(username)?;
        let product = self.require_product(reference)?;
        self.profiles.remove_product(user.id, product.id)?;

        let status = if self.profiles.has_product(user.id, product.id)? {
            RemovalStatus::Error
        } else {
            RemovalStatus::Success
        };
        info!(
            "event=profile_remove module=service status={} user_id={} product_id={}",
            match status {
                RemovalStatus::Success => "ok",
                RemovalStatus::Error => "error",
            },
            user.id,
            product.id
        );
        Ok(status)
    }

    /// Registers a product to a user, storing it first when needed.
    ///
    /// # Errors
    /// - `UserNotFound` when `username` is unknown; nothing is stored.
    /// - `Repo(Validation)` when the draft is invalid; nothing is evicted.
    /// - `QuotaExceeded` when storage is over cap and nothing can be evicted.
    pub fn register_product_for_user(
        &self,
        username: &str,
        draft: &ProductDraft,
        quota: &impl StorageQuota,
    ) -> ServiceResult<RegistrationOutcome> {
        let user = self.require_user(username)?;
        draft.validate().map_err(RepoError::from)?;

        let outcome = if self.products.product_exists(&draft.reference)? {
            RegistrationOutcome::AlreadyStored
        } else {
            let rows = quota.count_global_rows()?;
            if !quota.check_db_for_registration(rows)? {
                return Err(ServiceError::QuotaExceeded {
                    rows,
                    row_cap: quota.row_cap(),
                });
            }
            self.set_product_for_user_registration(draft)?;
            RegistrationOutcome::Created
        };

        let product = self.require_product(&draft.reference)?;
        self.profiles.add_product(user.id, product.id)?;
        info!(
            "event=profile_register module=service status=ok user_id={} product_id={} created={}",
            user.id,
            product.id,
            outcome == RegistrationOutcome::Created
        );
        Ok(outcome)
    }

    fn require_user(&self, username: &str) -> ServiceResult<User> {
        self.profiles
            .get_user(username)?
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
    }

    fn require_product(&self, reference: &str) -> ServiceResult<Product> {
        self.products
            .get_product_by_ref(reference)?
            .ok_or_else(|| ServiceError::ProductNotFound(reference.to_string()))
    }
}
