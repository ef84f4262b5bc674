//! Category model.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Database row id of a category.
pub type CategoryId = i64;

/// Grouping of products.
///
/// `total_products` comes from the upstream catalog, not from local link
/// counts. The smallest value marks the most specific category of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// External identifier such as `en:beverages`.
    pub api_id: String,
    pub total_products: u64,
}

/// Input for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub api_id: String,
    pub total_products: u64,
}

impl NewCategory {
    /// Builds a category input with lowercase name and id.
    pub fn new(name: &str, api_id: &str, total_products: u64) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            api_id: api_id.trim().to_lowercase(),
            total_products,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankField("name"));
        }
        if self.api_id.trim().is_empty() {
            return Err(ValidationError::BlankField("api_id"));
        }
        Ok(())
    }
}
