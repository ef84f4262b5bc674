//! Category repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `api_id` is unique; inserting it twice yields `RepoError::Duplicate`.
//! - `name_folded` is always derived from `name` on write.
//! - List results are ordered by row id for deterministic output.

use crate::model::category::{Category, CategoryId, NewCategory};
use crate::model::product::ProductId;
use crate::repo::{any_word_like, count_rows, RepoError, RepoResult};
use crate::search::query::fold_text;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    categories.id AS id,
    categories.name AS name,
    categories.api_id AS api_id,
    categories.total_products AS total_products
FROM categories";

/// Repository interface for category storage.
pub trait CategoryRepository {
    fn create_category(&self, category: &NewCategory) -> RepoResult<CategoryId>;
    fn get_category_by_api_id(&self, api_id: &str) -> RepoResult<Option<Category>>;
    /// Categories whose folded name contains any of `words`.
    fn search_categories(&self, words: &[String], limit: u32) -> RepoResult<Vec<Category>>;
    fn list_categories_for_product(&self, product_id: ProductId) -> RepoResult<Vec<Category>>;
    fn count_categories(&self) -> RepoResult<u64>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &NewCategory) -> RepoResult<CategoryId> {
        category.validate()?;
        let total_products = i64::try_from(category.total_products).map_err(|_| {
            RepoError::InvalidData(format!(
                "total_products out of range for `{}`",
                category.api_id
            ))
        })?;

        self.conn
            .execute(
                "INSERT INTO categories (name, name_folded, api_id, total_products)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    category.name.as_str(),
                    fold_text(&category.name),
                    category.api_id.as_str(),
                    total_products,
                ],
            )
            .map_err(|err| RepoError::from_insert(err, "category", &category.api_id))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_category_by_api_id(&self, api_id: &str) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE api_id = ?1;"))?;
        let mut rows = stmt.query([api_id.trim().to_lowercase()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn search_categories(&self, words: &[String], limit: u32) -> RepoResult<Vec<Category>> {
        if words.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let (clause, patterns) = any_word_like("categories.name_folded", words);
        let sql = format!("{CATEGORY_SELECT_SQL} WHERE {clause} ORDER BY categories.id ASC LIMIT ?");
        let mut bind_values: Vec<Value> = patterns.into_iter().map(Value::Text).collect();
        bind_values.push(Value::Integer(i64::from(limit)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn list_categories_for_product(&self, product_id: ProductId) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             INNER JOIN product_categories pc ON pc.category_id = categories.id
             WHERE pc.product_id = ?1
             ORDER BY categories.id ASC;"
        ))?;
        let mut rows = stmt.query([product_id])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn count_categories(&self) -> RepoResult<u64> {
        count_rows(self.conn, "categories")
    }
}

/// Looks up a category id by `api_id` inside an open transaction.
pub(crate) fn find_category_id(conn: &Connection, api_id: &str) -> RepoResult<Option<CategoryId>> {
    let id = conn
        .query_row(
            "SELECT id FROM categories WHERE api_id = ?1;",
            [api_id.trim().to_lowercase()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let total: i64 = row.get("total_products")?;
    let total_products = u64::try_from(total).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid total_products `{total}` in categories.total_products"
        ))
    })?;

    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        api_id: row.get("api_id")?,
        total_products,
    })
}
