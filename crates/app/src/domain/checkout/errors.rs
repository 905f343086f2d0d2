//! Checkout errors.

use thiserror::Error;

use crate::domain::{
    carts::CartsServiceError,
    catalog::{CatalogError, models::ProductUuid},
    checkout::validation::ValidationErrors,
    orders::OrdersServiceError,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("session id is required")]
    MissingSession,

    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Validation(ValidationErrors),

    #[error("product not found")]
    ProductNotFound,

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        requested: u64,
        available: u32,
    },

    #[error("item not in cart")]
    ItemNotInCart,

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("catalog is unavailable")]
    CatalogUnavailable,

    #[error("order could not be stored")]
    Persistence(#[source] OrdersServiceError),

    #[error("order not found")]
    OrderNotFound,
}

impl CheckoutError {
    /// Short label used for failure metrics and logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingSession => "missing_session",
            Self::EmptyCart => "empty_cart",
            Self::Validation(_) => "validation",
            Self::ProductNotFound => "product_not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::ItemNotInCart => "item_not_in_cart",
            Self::InvalidQuantity => "invalid_quantity",
            Self::CatalogUnavailable => "catalog_unavailable",
            Self::Persistence(_) => "persistence",
            Self::OrderNotFound => "order_not_found",
        }
    }
}

impl From<ValidationErrors> for CheckoutError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<CatalogError> for CheckoutError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::NotFound => Self::ProductNotFound,
            CatalogError::Unavailable | CatalogError::Sql(_) => Self::CatalogUnavailable,
        }
    }
}

impl From<CartsServiceError> for CheckoutError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::ProductNotFound => Self::ProductNotFound,
            CartsServiceError::InsufficientStock {
                product,
                requested,
                available,
            } => Self::InsufficientStock {
                product,
                requested,
                available,
            },
            CartsServiceError::ItemNotInCart => Self::ItemNotInCart,
            CartsServiceError::InvalidQuantity => Self::InvalidQuantity,
            CartsServiceError::CatalogUnavailable => Self::CatalogUnavailable,
            CartsServiceError::Sql(source) => Self::Persistence(OrdersServiceError::Sql(source)),
        }
    }
}

impl From<OrdersServiceError> for CheckoutError {
    fn from(error: OrdersServiceError) -> Self {
        match error {
            OrdersServiceError::NotFound => Self::OrderNotFound,
            other => Self::Persistence(other),
        }
    }
}
