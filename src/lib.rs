//! Redington Catalog
//!
//! Serves the storefront category tree.
//!
//! ## Features
//! - Native (platform) and Magento-imported taxonomies kept in one table
//! - Nested category forest assembled per request
//! - Orphaned categories reported through logs and domain events
//! - Postgres storage with embedded migrations

use thiserror::Error;

pub mod api;
pub mod config;
pub mod domain;
pub mod publisher;
pub mod repository;

pub use config::Config;
pub use domain::aggregates::{CategoryNode, CategoryRecord, CategoryTree, DropReason, DroppedCategory, RowError};
pub use domain::value_objects::CategorySource;
pub use repository::{CategoryRepository, PgCategoryRepository};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid category row at position {position}: {reason}")]
    InvalidRow { position: usize, reason: RowError },

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl CatalogError {
    /// True when the stored data, not the storage itself, is at fault.
    pub fn is_validation(&self) -> bool { matches!(self, Self::InvalidRow { .. }) }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
