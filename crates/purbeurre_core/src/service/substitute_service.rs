//! Lookup and substitute use-case service.
//!
//! # Responsibility
//! - Turn a free-text query into a category or product selection.
//! - Find healthier products sharing a category with a searched entity.
//!
//! # Invariants
//! - Categories are searched first; products only when no category matches.
//! - Substitutes of a product come from its category with the smallest
//!   `total_products`; on ties the category with the lowest id wins.
//! - Every product returned as a substitute has its `last_interaction`
//!   refreshed, so housekeeping evicts it last.

use crate::config::CatalogConfig;
use crate::model::category::Category;
use crate::model::product::Product;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::ProductRepository;
use crate::search::query::query_words;
use crate::search::selection::{ElementKind, SearchSelection};
use crate::service::ServiceResult;
use log::debug;

/// Use-case service for catalog lookups.
pub struct SubstituteService<C: CategoryRepository, P: ProductRepository> {
    categories: C,
    products: P,
    config: CatalogConfig,
}

impl<C: CategoryRepository, P: ProductRepository> SubstituteService<C, P> {
    pub fn new(categories: C, products: P, config: CatalogConfig) -> Self {
        Self {
            categories,
            products,
            config,
        }
    }

    /// Resolves a free-text query into matching categories, else products.
    ///
    /// Returns `None` when the cleaned query is empty or nothing matches.
    pub fn get_search_selection(&self, query: &str) -> ServiceResult<Option<SearchSelection>> {
        let words = query_words(query);
        if words.is_empty() {
            debug!("event=search_selection module=service status=empty_query");
            return Ok(None);
        }

        let categories = self
            .categories
            .search_categories(&words, self.config.result_limit)?;
        if !categories.is_empty() {
            debug!(
                "event=search_selection module=service status=ok kind=category words={} hits={}",
                words.len(),
                categories.len()
            );
            return Ok(Some(SearchSelection::from_categories(&categories)));
        }

        let products = self
            .products
            .search_products(&words, self.config.result_limit)?;
        debug!(
            "event=search_selection module=service status={} kind=product words={} hits={}",
            if products.is_empty() { "miss" } else { "ok" },
            words.len(),
            products.len()
        );
        Ok(SearchSelection::non_empty_products(&products))
    }

    /// Lists healthy substitutes for a category `api_id` or a product ref.
    ///
    /// Unknown ids, products without categories and empty categories all
    /// yield `None`.
    pub fn get_substitutes(
        &self,
        kind: ElementKind,
        id: &str,
    ) -> ServiceResult<Option<SearchSelection>> {
        let products = match kind {
            ElementKind::Category => self.healthy_products_from_category(id)?,
            ElementKind::Product => self.healthy_products_from_product(id)?,
        };
        debug!(
            "event=substitutes module=service status=ok kind={} hits={}",
            kind.as_str(),
            products.len()
        );
        Ok(SearchSelection::non_empty_products(&products))
    }

    fn healthy_products_from_product(&self, reference: &str) -> ServiceResult<Vec<Product>> {
        let Some(product) = self.products.get_product_by_ref(reference)? else {
            return Ok(Vec::new());
        };
        self.products.touch_products(&[product.id])?;

        let categories = self.categories.list_categories_for_product(product.id)?;
        match most_specific_category(&categories) {
            Some(category) => self.healthy_products_from_category(&category.api_id),
            None => Ok(Vec::new()),
        }
    }

    fn healthy_products_from_category(&self, api_id: &str) -> ServiceResult<Vec<Product>> {
        let Some(category) = self.categories.get_category_by_api_id(api_id)? else {
            return Ok(Vec::new());
        };

        let products = self.products.list_products_in_category(
            category.id,
            self.config.healthy_grade,
            self.config.result_limit,
        )?;
        let ids: Vec<_> = products.iter().map(|product| product.id).collect();
        self.products.touch_products(&ids)?;
        Ok(products)
    }
}

/// Picks the category with the fewest upstream products.
///
/// The first one wins on ties, so callers should pass categories in id
/// order.
pub fn most_specific_category(categories: &[Category]) -> Option<&Category> {
    categories
        .iter()
        .min_by_key(|category| category.total_products)
}
