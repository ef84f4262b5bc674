//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Keep SQL details away from service orchestration.
//!
//! # Invariants
//! - Write paths validate model input before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repository APIs return semantic errors (`NotFound`, `Duplicate`) in
//!   addition to DB transport errors.

pub mod category_repo;
pub mod product_repo;
pub mod profile_repo;

use crate::db::DbError;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for catalog persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound {
        entity: &'static str,
        key: String,
    },
    /// Unique key already taken.
    Duplicate {
        entity: &'static str,
        key: String,
    },
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Maps a UNIQUE constraint failure to `Duplicate`, anything else to `Db`.
    pub(crate) fn from_insert(err: rusqlite::Error, entity: &'static str, key: &str) -> Self {
        let is_unique_violation = matches!(
            &err,
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        );
        if is_unique_violation {
            return Self::Duplicate {
                entity,
                key: key.to_string(),
            };
        }
        Self::Db(DbError::Sqlite(err))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Duplicate { entity, key } => write!(f, "{entity} already exists: {key}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::Duplicate { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}

/// Builds `(column LIKE ? ESCAPE '\' OR ...)` plus its bind patterns.
///
/// Words are matched as substrings; `%` and `_` inside a word match
/// literally.
pub(crate) fn any_word_like(column: &str, words: &[String]) -> (String, Vec<String>) {
    let clause = words
        .iter()
        .map(|_| format!("{column} LIKE ? ESCAPE '\\'"))
        .collect::<Vec<_>>()
        .join(" OR ");
    let patterns = words
        .iter()
        .map(|word| {
            let escaped = word
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
        .collect();
    (format!("({clause})"), patterns)
}

pub(crate) fn count_rows(conn: &rusqlite::Connection, table: &str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count in {table}")))
}
