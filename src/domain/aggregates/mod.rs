//! Aggregates module
pub mod category;
pub mod category_tree;

pub use category::{Category, CategoryRecord, MagentoCategory, NativeCategory, RowError};
pub use category_tree::{CategoryNode, CategoryTree, DropReason, DroppedCategory};
