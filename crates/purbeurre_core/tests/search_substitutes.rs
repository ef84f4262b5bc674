mod common;

use common::*;
use purbeurre_core::db::open_db_in_memory;
use purbeurre_core::{
    CatalogConfig, ElementKind, Nutriscore, ProductRepository, SqliteCategoryRepository,
    SqliteProductRepository, SubstituteService,
};
use rusqlite::{params, Connection};

fn service(conn: &Connection) -> SubstituteService<SqliteCategoryRepository<'_>, SqliteProductRepository<'_>> {
    SubstituteService::new(
        SqliteCategoryRepository::new(conn),
        SqliteProductRepository::new(conn),
        CatalogConfig::default(),
    )
}

fn seeded() -> Connection {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);
    conn
}

#[test]
fn query_matching_no_category_falls_back_to_products() {
    let conn = seeded();
    let selection = service(&conn).get_search_selection("coca").unwrap().unwrap();

    assert_eq!(selection.kind, ElementKind::Product);
    assert_eq!(selection.number, 1);
    assert_eq!(refs(&selection), vec![BANANA_REF]);
    assert_eq!(selection.elements[0].name, "banane à la feuille de coca");
    assert_eq!(selection.elements[0].nutriscore, Some(Nutriscore::A));
}

#[test]
fn categories_take_precedence_over_products() {
    let conn = seeded();
    let selection = service(&conn)
        .get_search_selection("steack viande")
        .unwrap()
        .unwrap();

    assert_eq!(selection.kind, ElementKind::Category);
    assert_eq!(selection.number, 1);
    assert_eq!(selection.elements[0].name, "viandes");
    assert_eq!(selection.elements[0].description, "en:meats");
}

#[test]
fn category_lookup_is_case_insensitive_and_ordered() {
    let conn = seeded();
    let selection = service(&conn)
        .get_search_selection("BOISSONS")
        .unwrap()
        .unwrap();

    let api_ids: Vec<_> = selection
        .elements
        .iter()
        .map(|element| element.description.as_str())
        .collect();
    assert_eq!(
        api_ids,
        vec![
            "en:plant-based-foods-and-beverages",
            "en:beverages",
            "en:non-sugared-beverages",
            "en:non-alcoholic-beverages"
        ]
    );
}

#[test]
fn accented_names_match_plain_and_accented_queries() {
    let conn = seeded();
    let service = service(&conn);

    for query in ["gateaux", "Gâteaux"] {
        let selection = service.get_search_selection(query).unwrap().unwrap();
        assert_eq!(selection.kind, ElementKind::Category);
        assert_eq!(selection.elements[0].description, "en:biscuits-and-cakes");
    }
}

#[test]
fn any_query_word_is_enough_to_match() {
    let conn = seeded();
    let selection = service(&conn)
        .get_search_selection("steack nutella")
        .unwrap()
        .unwrap();

    assert_eq!(selection.kind, ElementKind::Product);
    assert_eq!(refs(&selection), vec![CHARAL_REF, NUTELLA_REF, FAKE_MEAT_REF]);
}

#[test]
fn stop_word_only_or_unknown_query_returns_none() {
    let conn = seeded();
    let service = service(&conn);

    assert!(service.get_search_selection("de la avec").unwrap().is_none());
    assert!(service.get_search_selection("   ").unwrap().is_none());
    assert!(service.get_search_selection("quinoa").unwrap().is_none());
}

#[test]
fn lookup_is_capped_by_result_limit() {
    let conn = open_db_in_memory().unwrap();
    let products = SqliteProductRepository::new(&conn);
    for index in 0..8 {
        products
            .create_product(&draft(
                &format!("yaourt nature {index}"),
                &format!("{}", 1000 + index),
                Nutriscore::B,
                &[],
            ))
            .unwrap();
    }

    let selection = service(&conn).get_search_selection("yaourt").unwrap().unwrap();
    assert_eq!(selection.number, 6);
    assert_eq!(refs(&selection)[0], "1000");
}

#[test]
fn category_substitutes_only_keep_healthy_products() {
    let conn = seeded();
    let selection = service(&conn)
        .get_substitutes(ElementKind::Category, "en:beverages")
        .unwrap()
        .unwrap();

    assert_eq!(selection.kind, ElementKind::Product);
    assert_eq!(refs(&selection), vec![JUICE_REF, BANANA_REF]);
}

#[test]
fn product_substitutes_use_smallest_category() {
    let conn = seeded();
    let service = service(&conn);

    // Cola sits in beverages (21875) and plant-based foods and beverages (32107).
    let from_cola = service
        .get_substitutes(ElementKind::Product, COLA_REF)
        .unwrap()
        .unwrap();
    assert_eq!(refs(&from_cola), vec![JUICE_REF, BANANA_REF]);

    // Banana is also in biscuits and cakes (7294), where it is alone.
    let from_banana = service
        .get_substitutes(ElementKind::Product, BANANA_REF)
        .unwrap()
        .unwrap();
    assert_eq!(refs(&from_banana), vec![BANANA_REF]);
}

#[test]
fn substitutes_are_none_when_nothing_qualifies() {
    let conn = seeded();
    let service = service(&conn);

    // Only a grade-b product lives in plant-based foods.
    assert!(service
        .get_substitutes(ElementKind::Product, BEAN_REF)
        .unwrap()
        .is_none());
    assert!(service
        .get_substitutes(ElementKind::Product, "000000")
        .unwrap()
        .is_none());
    assert!(service
        .get_substitutes(ElementKind::Category, "en:unknown")
        .unwrap()
        .is_none());
}

#[test]
fn product_without_category_has_no_substitutes() {
    let conn = seeded();
    SqliteProductRepository::new(&conn)
        .create_product(&draft("pain sans gluten", "555", Nutriscore::A, &["en:bread"]))
        .unwrap();

    assert!(service(&conn)
        .get_substitutes(ElementKind::Product, "555")
        .unwrap()
        .is_none());
}

#[test]
fn substitutes_refresh_last_interaction() {
    let conn = seeded();
    conn.execute("UPDATE products SET last_interaction = 0;", [])
        .unwrap();

    service(&conn)
        .get_substitutes(ElementKind::Product, COLA_REF)
        .unwrap()
        .unwrap();

    let touched: Vec<(String, i64)> = {
        let mut stmt = conn
            .prepare("SELECT ref, last_interaction FROM products ORDER BY id;")
            .unwrap();
        stmt.query_map(params![], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .map(Result::unwrap)
            .collect()
    };
    for (reference, last_interaction) in touched {
        let expected_touched = [JUICE_REF, COLA_REF, BANANA_REF].contains(&reference.as_str());
        assert_eq!(last_interaction > 0, expected_touched, "product {reference}");
    }
}

#[test]
fn custom_healthy_grade_is_honored() {
    let conn = seeded();
    let config = CatalogConfig {
        healthy_grade: Nutriscore::B,
        ..CatalogConfig::default()
    };
    let service = SubstituteService::new(
        SqliteCategoryRepository::new(&conn),
        SqliteProductRepository::new(&conn),
        config,
    );

    let selection = service
        .get_substitutes(ElementKind::Category, "en:plant-based-foods")
        .unwrap()
        .unwrap();
    assert_eq!(refs(&selection), vec![BEAN_REF]);
}
