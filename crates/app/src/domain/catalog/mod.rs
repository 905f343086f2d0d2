//! Catalog
//!
//! Read-only view of sellable products: current price, stock level and the
//! descriptive attributes a cart line snapshots.

pub mod errors;
pub mod models;
mod reader;
mod repository;

pub use errors::CatalogError;
pub use reader::*;
