//! Free-text search helpers.
//!
//! # Responsibility
//! - Normalize user queries before they reach SQL.
//! - Shape category/product hits into one result envelope.

pub mod query;
pub mod selection;
