//! User profile model.
//!
//! A profile is the set of products a user registered as substitutes. It has
//! no row of its own: the `profile_products` link table is keyed by user.

use serde::{Deserialize, Serialize};

/// Database row id of a user.
pub type UserId = i64;

/// Owner of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
}
