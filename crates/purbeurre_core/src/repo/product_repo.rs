//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist products and their category links.
//! - Answer the lookups behind search, substitutes and housekeeping.
//!
//! # Invariants
//! - A product and its category links are written in one transaction.
//! - Unknown category ids in a draft are skipped, never created.
//! - Deleting a product cascades to category and profile links.

use crate::model::category::CategoryId;
use crate::model::product::{Nutriscore, Product, ProductDraft, ProductId};
use crate::repo::category_repo::find_category_id;
use crate::repo::{any_word_like, count_rows, now_epoch_ms, RepoError, RepoResult};
use crate::search::query::fold_text;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

pub(crate) const PRODUCT_SELECT_SQL: &str = "SELECT
    products.id AS id,
    products.name AS name,
    products.ref AS ref,
    products.nutriscore AS nutriscore,
    products.picture AS picture,
    products.description AS description,
    products.last_interaction AS last_interaction
FROM products";

/// Repository interface for product storage.
pub trait ProductRepository {
    /// Inserts a product and links it to the known categories of the draft.
    fn create_product(&self, draft: &ProductDraft) -> RepoResult<ProductId>;
    fn get_product_by_ref(&self, reference: &str) -> RepoResult<Option<Product>>;
    fn product_exists(&self, reference: &str) -> RepoResult<bool>;
    /// Products whose folded name contains any of `words`.
    fn search_products(&self, words: &[String], limit: u32) -> RepoResult<Vec<Product>>;
    /// Products of one category with the given grade, ordered by id.
    fn list_products_in_category(
        &self,
        category_id: CategoryId,
        grade: Nutriscore,
        limit: u32,
    ) -> RepoResult<Vec<Product>>;
    /// Sets `last_interaction` of every listed product to now.
    fn touch_products(&self, ids: &[ProductId]) -> RepoResult<()>;
    fn count_products(&self) -> RepoResult<u64>;
    fn count_category_links(&self) -> RepoResult<u64>;
    /// Oldest product nobody registered, never the most recently touched one.
    fn find_eviction_candidate(&self) -> RepoResult<Option<ProductId>>;
    fn delete_product(&self, id: ProductId) -> RepoResult<()>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, draft: &ProductDraft) -> RepoResult<ProductId> {
        draft.validate()?;
        let name = draft.name.trim().to_lowercase();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO products (
                name,
                name_folded,
                ref,
                nutriscore,
                picture,
                description,
                last_interaction
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                name.as_str(),
                fold_text(&name),
                draft.reference.as_str(),
                draft.nutriscore.as_str(),
                draft.image_url.as_str(),
                draft.description.as_str(),
                now_epoch_ms(),
            ],
        )
        .map_err(|err| RepoError::from_insert(err, "product", &draft.reference))?;
        let product_id = tx.last_insert_rowid();

        for api_id in &draft.categories {
            if let Some(category_id) = find_category_id(&tx, api_id)? {
                tx.execute(
                    "INSERT OR IGNORE INTO product_categories (product_id, category_id)
                     VALUES (?1, ?2);",
                    params![product_id, category_id],
                )?;
            }
        }
        tx.commit()?;

        Ok(product_id)
    }

    fn get_product_by_ref(&self, reference: &str) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE products.ref = ?1;"))?;
        let mut rows = stmt.query([reference])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }
        Ok(None)
    }

    fn product_exists(&self, reference: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM products WHERE ref = ?1);",
            [reference],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn search_products(&self, words: &[String], limit: u32) -> RepoResult<Vec<Product>> {
        if words.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let (clause, patterns) = any_word_like("products.name_folded", words);
        let sql = format!("{PRODUCT_SELECT_SQL} WHERE {clause} ORDER BY products.id ASC LIMIT ?");
        let mut bind_values: Vec<Value> = patterns.into_iter().map(Value::Text).collect();
        bind_values.push(Value::Integer(i64::from(limit)));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query(params_from_iter(bind_values))?;
        collect_products(rows)
    }

    fn list_products_in_category(
        &self,
        category_id: CategoryId,
        grade: Nutriscore,
        limit: u32,
    ) -> RepoResult<Vec<Product>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL}
             INNER JOIN product_categories pc ON pc.product_id = products.id
             WHERE pc.category_id = ?1
               AND products.nutriscore = ?2
             ORDER BY products.id ASC
             LIMIT ?3;"
        ))?;
        let rows = stmt.query(params![category_id, grade.as_str(), i64::from(limit)])?;
        collect_products(rows)
    }

    fn touch_products(&self, ids: &[ProductId]) -> RepoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let now = now_epoch_ms();
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt =
                tx.prepare("UPDATE products SET last_interaction = ?1 WHERE id = ?2;")?;
            for id in ids {
                stmt.execute(params![now, id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn count_products(&self) -> RepoResult<u64> {
        count_rows(self.conn, "products")
    }

    fn count_category_links(&self) -> RepoResult<u64> {
        count_rows(self.conn, "product_categories")
    }

    fn find_eviction_candidate(&self) -> RepoResult<Option<ProductId>> {
        let id = self
            .conn
            .query_row(
                "SELECT p.id
                 FROM products p
                 WHERE NOT EXISTS (
                     SELECT 1 FROM profile_products pp WHERE pp.product_id = p.id
                 )
                   AND p.id != (
                     SELECT id FROM products
                     ORDER BY last_interaction DESC, id DESC
                     LIMIT 1
                 )
                 ORDER BY p.last_interaction ASC, p.id ASC
                 LIMIT 1;",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn delete_product(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("product", id.to_string()));
        }
        Ok(())
    }
}

pub(crate) fn collect_products(mut rows: rusqlite::Rows<'_>) -> RepoResult<Vec<Product>> {
    let mut products = Vec::new();
    while let Some(row) = rows.next()? {
        products.push(parse_product_row(row)?);
    }
    Ok(products)
}

pub(crate) fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let grade_text: String = row.get("nutriscore")?;
    let nutriscore = grade_text.parse::<Nutriscore>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid nutriscore `{grade_text}` in products.nutriscore"
        ))
    })?;

    Ok(Product {
        id: row.get("id")?,
        name: row.get("name")?,
        reference: row.get("ref")?,
        nutriscore,
        picture: row.get("picture")?,
        description: row.get("description")?,
        last_interaction: row.get("last_interaction")?,
    })
}
