//! Product model.
//!
//! # Invariants
//! - `reference` matches `^[0-9]{1,32}$`.
//! - `name` is stored lowercase.
//! - `last_interaction` is epoch milliseconds of the last lookup touching
//!   the product; housekeeping evicts the oldest unregistered rows first.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::ValidationError;

/// Database row id of a product.
pub type ProductId = i64;

static PRODUCT_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,32}$").expect("valid product ref regex"));

/// Nutrition grade, `A` being the healthiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutriscore {
    A,
    B,
    C,
    D,
    E,
}

impl Nutriscore {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
            Self::E => "e",
        }
    }
}

impl Display for Nutriscore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nutriscore {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            "c" => Ok(Self::C),
            "d" => Ok(Self::D),
            "e" => Ok(Self::E),
            _ => Err(ValidationError::InvalidNutriscore(value.to_string())),
        }
    }
}

/// Persisted catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Barcode, serialized as `ref`.
    #[serde(rename = "ref")]
    pub reference: String,
    pub nutriscore: Nutriscore,
    /// Image URL.
    pub picture: String,
    pub description: String,
    pub last_interaction: i64,
}

/// Input for creating a product together with its category links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub nutriscore: Nutriscore,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    /// Category `api_id` values; unknown ids are skipped on insert.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, reference: impl Into<String>, nutriscore: Nutriscore) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            nutriscore,
            image_url: String::new(),
            description: String::new(),
            categories: Vec::new(),
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankField("name"));
        }
        validate_reference(&self.reference)
    }
}

/// Checks that `reference` is a digit-only barcode.
pub fn validate_reference(reference: &str) -> Result<(), ValidationError> {
    if PRODUCT_REF_RE.is_match(reference) {
        Ok(())
    } else {
        Err(ValidationError::InvalidRef(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_reference, Nutriscore, ProductDraft};

    #[test]
    fn nutriscore_parses_case_insensitively() {
        assert_eq!(" A ".parse::<Nutriscore>().unwrap(), Nutriscore::A);
        assert_eq!("e".parse::<Nutriscore>().unwrap(), Nutriscore::E);
        assert!("f".parse::<Nutriscore>().is_err());
        assert!("".parse::<Nutriscore>().is_err());
    }

    #[test]
    fn reference_must_be_digits() {
        assert!(validate_reference("4567859631223").is_ok());
        assert!(validate_reference("").is_err());
        assert!(validate_reference("12a4").is_err());
    }

    #[test]
    fn draft_rejects_blank_name() {
        let draft = ProductDraft::new("  ", "123", Nutriscore::B);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn draft_serializes_reference_as_ref() {
        let draft = ProductDraft::new("jus", "123", Nutriscore::A).with_categories(["en:beverages"]);
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["ref"], "123");
        assert_eq!(json["nutriscore"], "a");
        assert_eq!(json["categories"][0], "en:beverages");
    }
}
