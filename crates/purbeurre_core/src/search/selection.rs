//! Uniform result envelope for lookups.
//!
//! Category and product hits share one element shape so callers render them
//! the same way. A category element only fills `name` and `description`
//! (its `api_id`); product-only fields stay `None` and serialize as `""`.

use serde::{Deserialize, Serialize};

use crate::model::category::Category;
use crate::model::product::{Nutriscore, Product};

/// Kind of entity a selection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Category,
    Product,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Product => "product",
        }
    }
}

/// One displayed element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionElement {
    pub name: String,
    #[serde(rename = "ref", with = "empty_string")]
    pub reference: Option<String>,
    #[serde(with = "empty_string")]
    pub nutriscore: Option<Nutriscore>,
    pub description: String,
    #[serde(with = "empty_string")]
    pub image_url: Option<String>,
}

/// Maps absent product fields to `""` on the wire and back.
mod empty_string {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

impl From<&Category> for SelectionElement {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            reference: None,
            nutriscore: None,
            description: category.api_id.clone(),
            image_url: None,
        }
    }
}

impl From<&Product> for SelectionElement {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            reference: Some(product.reference.clone()),
            nutriscore: Some(product.nutriscore),
            description: product.description.clone(),
            image_url: Some(product.picture.clone()),
        }
    }
}

/// Result envelope returned by lookups and profile listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSelection {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Always equals `elements.len()`.
    pub number: usize,
    pub elements: Vec<SelectionElement>,
}

impl SearchSelection {
    pub fn from_categories(categories: &[Category]) -> Self {
        Self::build(ElementKind::Category, categories.iter().map(Into::into))
    }

    pub fn from_products(products: &[Product]) -> Self {
        Self::build(ElementKind::Product, products.iter().map(Into::into))
    }

    /// Builds a selection, or `None` when there is nothing to show.
    pub fn non_empty_products(products: &[Product]) -> Option<Self> {
        (!products.is_empty()).then(|| Self::from_products(products))
    }

    fn build(kind: ElementKind, elements: impl Iterator<Item = SelectionElement>) -> Self {
        let elements: Vec<_> = elements.collect();
        Self {
            kind,
            number: elements.len(),
            elements,
        }
    }
}
