//! Catalog population from Open Food Facts exports.
//!
//! # Responsibility
//! - Decode category and product dumps in Open Food Facts JSON shapes.
//! - Store them through the repositories, skipping unusable entries.
//!
//! # Invariants
//! - Categories are imported before products so product links resolve.
//! - Import never overwrites stored rows; duplicates are counted as skipped.

pub mod off;

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use off::{import_catalog, parse_categories, parse_products, ImportReport, OffCategory, OffProduct};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read catalog dump: {err}"),
            Self::Parse(err) => write!(f, "failed to decode catalog dump: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
