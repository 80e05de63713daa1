//! Catalog domain: category taxonomies and the tree built from them.
pub mod aggregates;
pub mod events;
pub mod value_objects;
