use purbeurre_core::db::open_db_in_memory;
use purbeurre_core::import::{import_catalog, parse_categories, parse_products, ImportError};
use purbeurre_core::{
    CatalogConfig, ElementKind, SqliteCategoryRepository, SqliteProductRepository,
    SubstituteService,
};

const CATEGORIES_JSON: &str = r#"{
  "count": 3,
  "tags": [
    { "id": "en:beverages", "name": "Boissons", "products": 21875,
      "url": "https://fr.openfoodfacts.org/categorie/boissons" },
    { "id": "en:spreads", "name": "Produits à tartiner", "products": 6724 },
    { "id": "EN:Beverages", "name": "Boissons (doublon)", "products": 1 }
  ]
}"#;

const PRODUCTS_JSON: &str = r#"{
  "page": 1,
  "products": [
    { "product_name_fr": "Le jus de raisin 100% jus de fruits", "code": "123456789",
      "image_url": "https://static.openfoodfacts.org/images/products/jus.jpg",
      "nutrition_grade_fr": "a", "generic_name_fr": "jus de fruit naturel",
      "categories_hierarchy": ["en:plant-based-foods-and-beverages", "en:beverages"] },
    { "product_name_fr": "nutella plein d'huiles de palme", "code": "4567859631223",
      "nutrition_grade_fr": "e", "categories_hierarchy": ["en:spreads"] },
    { "product_name_fr": "sans note", "code": "42" },
    { "code": "43", "nutrition_grade_fr": "a" },
    { "product_name_fr": "doublon du jus", "code": "123456789", "nutrition_grade_fr": "b" }
  ]
}"#;

#[test]
fn import_stores_usable_entries_and_counts_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::new(&conn);
    let products = SqliteProductRepository::new(&conn);

    let report = import_catalog(
        &categories,
        &products,
        &parse_categories(CATEGORIES_JSON).unwrap(),
        &parse_products(PRODUCTS_JSON).unwrap(),
    )
    .unwrap();

    assert_eq!(report.categories_created, 2);
    assert_eq!(report.categories_skipped, 1);
    assert_eq!(report.products_created, 2);
    assert_eq!(report.products_skipped, 3);
}

#[test]
fn imported_catalog_is_searchable() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::new(&conn);
    let products = SqliteProductRepository::new(&conn);
    import_catalog(
        &categories,
        &products,
        &parse_categories(CATEGORIES_JSON).unwrap(),
        &parse_products(PRODUCTS_JSON).unwrap(),
    )
    .unwrap();

    let service = SubstituteService::new(categories, products, CatalogConfig::default());
    let selection = service.get_search_selection("tartiner").unwrap().unwrap();
    assert_eq!(selection.kind, ElementKind::Category);
    assert_eq!(selection.elements[0].name, "produits à tartiner");

    let substitutes = service
        .get_substitutes(ElementKind::Category, "en:beverages")
        .unwrap()
        .unwrap();
    assert_eq!(
        substitutes.elements[0].image_url.as_deref(),
        Some("https://static.openfoodfacts.org/images/products/jus.jpg")
    );
    assert_eq!(substitutes.elements[0].description, "jus de fruit naturel");
}

#[test]
fn malformed_dump_is_a_parse_error() {
    let err = parse_products(r#"{ "items": [] }"#).unwrap_err();
    assert!(matches!(err, ImportError::Parse(_)));
}
