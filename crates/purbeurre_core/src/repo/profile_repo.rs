//! User/profile repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `username` is unique; lookups are exact matches.
//! - Registering the same product twice keeps a single link.

use crate::model::product::{Product, ProductId};
use crate::model::profile::{User, UserId};
use crate::model::ValidationError;
use crate::repo::product_repo::{collect_products, PRODUCT_SELECT_SQL};
use crate::repo::{count_rows, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for users and their registered products.
pub trait ProfileRepository {
    fn create_user(&self, username: &str, email: Option<&str>) -> RepoResult<UserId>;
    fn get_user(&self, username: &str) -> RepoResult<Option<User>>;
    fn add_product(&self, user_id: UserId, product_id: ProductId) -> RepoResult<()>;
    /// Returns whether a link was removed.
    fn remove_product(&self, user_id: UserId, product_id: ProductId) -> RepoResult<bool>;
    fn has_product(&self, user_id: UserId, product_id: ProductId) -> RepoResult<bool>;
    /// Registered products ordered by product id.
    fn list_products(&self, user_id: UserId) -> RepoResult<Vec<Product>>;
    fn count_users(&self) -> RepoResult<u64>;
    fn count_profile_links(&self) -> RepoResult<u64>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn create_user(&self, username: &str, email: Option<&str>) -> RepoResult<UserId> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::BlankField("username").into());
        }
        let email = email.map(str::trim).filter(|value| !value.is_empty());

        self.conn
            .execute(
                "INSERT INTO users (username, email) VALUES (?1, ?2);",
                params![username, email],
            )
            .map_err(|err| RepoError::from_insert(err, "user", username))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_user(&self, username: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, email FROM users WHERE username = ?1;")?;
        let mut rows = stmt.query([username.trim()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(User {
                id: row.get("id")?,
                username: row.get("username")?,
                email: row.get("email")?,
            }));
        }
        Ok(None)
    }

    fn add_product(&self, user_id: UserId, product_id: ProductId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO profile_products (user_id, product_id) VALUES (?1, ?2);",
            params![user_id, product_id],
        )?;
        Ok(())
    }

    fn remove_product(&self, user_id: UserId, product_id: ProductId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM profile_products WHERE user_id = ?1 AND product_id = ?2;",
            params![user_id, product_id],
        )?;
        Ok(changed > 0)
    }

    fn has_product(&self, user_id: UserId, product_id: ProductId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM profile_products WHERE user_id = ?1 AND product_id = ?2
            );",
            params![user_id, product_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_products(&self, user_id: UserId) -> RepoResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL}
             INNER JOIN profile_products pp ON pp.product_id = products.id
             WHERE pp.user_id = ?1
             ORDER BY products.id ASC;"
        ))?;
        let rows = stmt.query([user_id])?;
        collect_products(rows)
    }

    fn count_users(&self) -> RepoResult<u64> {
        count_rows(self.conn, "users")
    }

    fn count_profile_links(&self) -> RepoResult<u64> {
        count_rows(self.conn, "profile_products")
    }
}
