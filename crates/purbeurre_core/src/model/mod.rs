//! Catalog domain model.
//!
//! # Responsibility
//! - Define the records shared by repositories, services and the CLI.
//! - Own write-time validation rules for catalog entries.
//!
//! # Invariants
//! - Product refs are digit-only barcodes and unique across the catalog.
//! - Category `api_id` values are unique and stored lowercase.

pub mod category;
pub mod product;
pub mod profile;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure raised before a record is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank after trim.
    BlankField(&'static str),
    /// Product ref is not a digit-only barcode.
    InvalidRef(String),
    /// Nutrition grade is not one of `a..e`.
    InvalidNutriscore(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::InvalidRef(value) => write!(f, "invalid product ref `{value}`"),
            Self::InvalidNutriscore(value) => write!(f, "invalid nutriscore `{value}`"),
        }
    }
}

impl Error for ValidationError {}
