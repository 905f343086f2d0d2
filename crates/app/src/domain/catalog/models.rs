//! Catalog Models

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product as currently offered by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub sku: String,
    /// Unit price in minor currency units.
    pub price: u64,
    pub stock: u32,
}
