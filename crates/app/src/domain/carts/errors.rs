//! Carts service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::catalog::{CatalogError, models::ProductUuid};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("product not found")]
    ProductNotFound,

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        requested: u64,
        available: u32,
    },

    #[error("product is not in the cart")]
    ItemNotInCart,

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("catalog unavailable")]
    CatalogUnavailable,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<CatalogError> for CartsServiceError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::NotFound => Self::ProductNotFound,
            CatalogError::Unavailable => Self::CatalogUnavailable,
            CatalogError::Sql(source) => Self::Sql(source),
        }
    }
}
