//! Open Food Facts dump decoding and import.

use crate::import::ImportError;
use crate::model::category::NewCategory;
use crate::model::product::{Nutriscore, ProductDraft};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::ProductRepository;
use crate::repo::RepoError;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Category entry of the `categories.json` taxonomy dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub products: u64,
    #[serde(default)]
    pub url: Option<String>,
}

/// Product entry of a search API page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffProduct {
    #[serde(default)]
    pub product_name_fr: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub nutrition_grade_fr: Option<String>,
    #[serde(default)]
    pub generic_name_fr: Option<String>,
    #[serde(default)]
    pub categories_hierarchy: Vec<String>,
}

impl OffProduct {
    /// Converts to a draft, or `None` when name, code or grade is unusable.
    pub fn to_draft(&self) -> Option<ProductDraft> {
        let name = self.product_name_fr.as_deref().map(str::trim)?;
        let code = self.code.as_deref().map(str::trim)?;
        let grade = self.nutrition_grade_fr.as_deref()?.parse::<Nutriscore>().ok()?;

        let mut draft = ProductDraft::new(name, code, grade)
            .with_categories(self.categories_hierarchy.iter().map(|id| id.to_lowercase()));
        draft.image_url = self.image_url.clone().unwrap_or_default();
        draft.description = self.generic_name_fr.clone().unwrap_or_default();
        draft.validate().ok()?;
        Some(draft)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryDump {
    List(Vec<OffCategory>),
    Tagged { tags: Vec<OffCategory> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductDump {
    List(Vec<OffProduct>),
    Paged { products: Vec<OffProduct> },
}

/// Decodes a bare category array or a `{ "tags": [...] }` dump.
pub fn parse_categories(raw: &str) -> Result<Vec<OffCategory>, ImportError> {
    Ok(match serde_json::from_str::<CategoryDump>(raw)? {
        CategoryDump::List(items) | CategoryDump::Tagged { tags: items } => items,
    })
}

/// Decodes a bare product array or a `{ "products": [...] }` page.
pub fn parse_products(raw: &str) -> Result<Vec<OffProduct>, ImportError> {
    Ok(match serde_json::from_str::<ProductDump>(raw)? {
        ProductDump::List(items) | ProductDump::Paged { products: items } => items,
    })
}

/// Counters reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub categories_created: usize,
    pub categories_skipped: usize,
    pub products_created: usize,
    pub products_skipped: usize,
}

/// Stores categories, then products with their category links.
///
/// Entries that already exist or fail validation are skipped and counted.
pub fn import_catalog(
    categories_repo: &impl CategoryRepository,
    products_repo: &impl ProductRepository,
    categories: &[OffCategory],
    products: &[OffProduct],
) -> Result<ImportReport, ImportError> {
    let mut report = ImportReport::default();

    for category in categories {
        let input = NewCategory::new(&category.name, &category.id, category.products);
        match categories_repo.create_category(&input) {
            Ok(_) => report.categories_created += 1,
            Err(RepoError::Duplicate { .. } | RepoError::Validation(_)) => {
                report.categories_skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    for product in products {
        let Some(draft) = product.to_draft() else {
            report.products_skipped += 1;
            continue;
        };
        match products_repo.create_product(&draft) {
            Ok(_) => report.products_created += 1,
            Err(RepoError::Duplicate { .. } | RepoError::Validation(_)) => {
                debug!("event=import_product module=import status=skipped reason=duplicate_or_invalid");
                report.products_skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!(
        "event=import_catalog module=import status=ok categories_created={} categories_skipped={} products_created={} products_skipped={}",
        report.categories_created,
        report.categories_skipped,
        report.products_created,
        report.products_skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{parse_categories, parse_products, OffProduct};
    use crate::model::product::Nutriscore;

    #[test]
    fn categories_accept_tagged_dump() {
        let raw = r#"{ "count": 1, "tags": [
            { "id": "en:meats", "name": "Viandes", "products": 7191,
              "url": "https://fr.openfoodfacts.org/categorie/viandes" }
        ] }"#;
        let categories = parse_categories(raw).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].products, 7191);
    }

    #[test]
    fn products_accept_bare_array() {
        let raw = r#"[{ "product_name_fr": "steack charal", "code": "987695121",
                        "nutrition_grade_fr": "a", "categories_hierarchy": ["en:meats"] }]"#;
        let products = parse_products(raw).unwrap();
        assert_eq!(products.len(), 1);
        assert!(products[0].image_url.is_none());
    }

    #[test]
    fn product_without_grade_has_no_draft() {
        let product = OffProduct {
            product_name_fr: Some("mystère".to_string()),
            code: Some("42".to_string()),
            ..OffProduct::default()
        };
        assert!(product.to_draft().is_none());
    }

    #[test]
    fn draft_lowercases_category_ids_and_keeps_fields() {
        let product = OffProduct {
            product_name_fr: Some("Le haricot".to_string()),
            code: Some("987654321".to_string()),
            image_url: Some("https://img/haricot.jpg".to_string()),
            nutrition_grade_fr: Some("B".to_string()),
            generic_name_fr: Some(String::new()),
            categories_hierarchy: vec!["EN:Plant-Based-Foods".to_string()],
        };
        let draft = product.to_draft().unwrap();
        assert_eq!(draft.nutriscore, Nutriscore::B);
        assert_eq!(draft.categories, vec!["en:plant-based-foods"]);
        assert_eq!(draft.image_url, "https://img/haricot.jpg");
    }
}
