//! Storage-quota housekeeping.
//!
//! # Responsibility
//! - Count every row the hosting plan bills for.
//! - Free one row slot before a registration when storage is over cap.
//!
//! # Invariants
//! - Only products no user registered are evicted.
//! - The most recently touched product is never evicted.
//! - At most one product is deleted per check.

use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::ProductRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::service::ServiceResult;
use log::{info, warn};

/// Row accounting seam used by the registration flow.
pub trait StorageQuota {
    /// Counts categories, products, users and both link tables.
    fn count_global_rows(&self) -> ServiceResult<u64>;
    /// Returns whether storage can take one more product for `rows` rows.
    ///
    /// Over the cap this may delete one unregistered product.
    fn check_db_for_registration(&self, rows: u64) -> ServiceResult<bool>;
    fn row_cap(&self) -> u64;
}

/// Repository-backed quota keeper.
pub struct QuotaService<C, P, U>
where
    C: CategoryRepository,
    P: ProductRepository,
    U: ProfileRepository,
{
    categories: C,
    products: P,
    profiles: U,
    row_cap: u64,
}

impl<C, P, U> QuotaService<C, P, U>
where
    C: CategoryRepository,
    P: ProductRepository,
    U: ProfileRepository,
{
    pub fn new(categories: C, products: P, profiles: U, row_cap: u64) -> Self {
        Self {
            categories,
            products,
            profiles,
            row_cap,
        }
    }
}

impl<C, P, U> StorageQuota for QuotaService<C, P, U>
where
    C: CategoryRepository,
    P: ProductRepository,
    U: ProfileRepository,
{
    fn count_global_rows(&self) -> ServiceResult<u64> {
        let rows = self.categories.count_categories()?
            + self.products.count_products()?
            + self.products.count_category_links()?
            + self.profiles.count_users()?
            + self.profiles.count_profile_links()?;
        Ok(rows)
    }

    fn check_db_for_registration(&self, rows: u64) -> ServiceResult<bool> {
        if rows <= self.row_cap {
            return Ok(true);
        }

        match self.products.find_eviction_candidate()? {
            Some(product_id) => {
                self.products.delete_product(product_id)?;
                info!(
                    "event=quota_evict module=service status=ok rows={rows} row_cap={} product_id={product_id}",
                    self.row_cap
                );
                Ok(true)
            }
            None => {
                warn!(
                    "event=quota_evict module=service status=exhausted rows={rows} row_cap={}",
                    self.row_cap
                );
                Ok(false)
            }
        }
    }

    fn row_cap(&self) -> u64 {
        self.row_cap
    }
}
