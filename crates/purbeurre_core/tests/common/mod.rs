#![allow(dead_code)]

use purbeurre_core::{
    CategoryRepository, NewCategory, Nutriscore, ProductDraft, ProductRepository,
    ProfileRepository, SqliteCategoryRepository, SqliteProductRepository,
    SqliteProfileRepository,
};
use rusqlite::Connection;

pub const JUICE_REF: &str = "123456789";
pub const BEAN_REF: &str = "987654321";
pub const COLA_REF: &str = "456789123";
pub const BANANA_REF: &str = "12345787459";
pub const CHARAL_REF: &str = "987695121";
pub const NUTELLA_REF: &str = "4567859631223";
pub const FAKE_MEAT_REF: &str = "987751251";
pub const MILK_REF: &str = "474369523";

pub const FUNCTIONAL_USER: &str = "test-functional";

const CATEGORIES: &[(&str, &str, u64)] = &[
    (
        "Aliments et boissons à base de végétaux",
        "en:plant-based-foods-and-beverages",
        32107,
    ),
    ("Aliments d'origine végétale", "en:plant-based-foods", 27435),
    ("Boissons", "en:beverages", 21875),
    ("Boissons non sucrées", "en:non-sugared-beverages", 9153),
    ("Produits fermentés", "en:fermented-foods", 8006),
    ("Produits laitiers fermentés", "en:fermented-milk-products", 8002),
    ("Boissons sans alcool", "en:non-alcoholic-beverages", 7646),
    ("Biscuits et gâteaux", "en:biscuits-and-cakes", 7294),
    ("Viandes", "en:meats", 7191),
    ("Produits à tartiner", "en:spreads", 6724),
];

/// Seeds ten categories, eight products and one user owning the juice.
pub fn seed_catalog(conn: &Connection) {
    let categories = SqliteCategoryRepository::new(conn);
    for (name, api_id, total) in CATEGORIES {
        categories
            .create_category(&NewCategory::new(name, api_id, *total))
            .unwrap();
    }

    let products = SqliteProductRepository::new(conn);
    for draft in product_drafts() {
        products.create_product(&draft).unwrap();
    }

    let profiles = SqliteProfileRepository::new(conn);
    let user_id = profiles
        .create_user(FUNCTIONAL_USER, Some("test-functional@register.com"))
        .unwrap();
    let juice = products.get_product_by_ref(JUICE_REF).unwrap().unwrap();
    profiles.add_product(user_id, juice.id).unwrap();
}

pub fn product_drafts() -> Vec<ProductDraft> {
    vec![
        draft(
            "Le jus de raisin 100% jus de fruits",
            JUICE_REF,
            Nutriscore::A,
            &["en:plant-based-foods-and-beverages", "en:beverages"],
        ),
        draft(
            "Le haricot 100% naturellement bleue",
            BEAN_REF,
            Nutriscore::B,
            &["en:plant-based-foods"],
        ),
        draft(
            "cola à la mousse de bière",
            COLA_REF,
            Nutriscore::D,
            &["en:beverages", "en:plant-based-foods-and-beverages"],
        ),
        draft(
            "Banane à la feuille de coca",
            BANANA_REF,
            Nutriscore::A,
            &[
                "en:plant-based-foods-and-beverages",
                "en:beverages",
                "en:biscuits-and-cakes",
            ],
        ),
        draft("steack charal", CHARAL_REF, Nutriscore::A, &["en:meats"]),
        draft(
            "nutella plein d'huiles de palme",
            NUTELLA_REF,
            Nutriscore::A,
            &["en:spreads"],
        ),
        draft(
            "steack de fausses viandes",
            FAKE_MEAT_REF,
            Nutriscore::A,
            &["en:meats"],
        ),
        draft(
            "lait demi-écrémé pour une meilleure digestion",
            MILK_REF,
            Nutriscore::A,
            &["en:non-alcoholic-beverages", "en:fermented-milk-products"],
        ),
    ]
}

pub fn draft(name: &str, reference: &str, grade: Nutriscore, categories: &[&str]) -> ProductDraft {
    let mut draft = ProductDraft::new(name, reference, grade)
        .with_categories(categories.iter().copied());
    draft.image_url = format!("https://static.openfoodfacts.org/images/products/{reference}.jpg");
    draft
}

pub fn refs(selection: &purbeurre_core::SearchSelection) -> Vec<String> {
    selection
        .elements
        .iter()
        .map(|element| element.reference.clone().unwrap_or_default())
        .collect()
}

pub fn table_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
