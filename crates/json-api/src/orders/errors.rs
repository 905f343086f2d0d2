//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::checkout::CheckoutError;

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::MissingSession => {
            StatusError::bad_request().brief("X-Session-ID header is required")
        }
        CheckoutError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutError::Validation(errors) => StatusError::bad_request()
            .brief("Invalid checkout form")
            .detail(errors.to_string()),
        CheckoutError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be greater than zero")
        }
        error @ CheckoutError::InsufficientStock { .. } => StatusError::bad_request()
            .brief("Insufficient stock")
            .detail(error.to_string()),
        CheckoutError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CheckoutError::ItemNotInCart => {
            StatusError::not_found().brief("Product is not in the cart")
        }
        CheckoutError::OrderNotFound => StatusError::not_found().brief("Order not found"),
        CheckoutError::CatalogUnavailable => {
            StatusError::service_unavailable().brief("Catalog is unavailable")
        }
        CheckoutError::Persistence(source) => {
            error!("failed to store order: {source}");

            StatusError::internal_server_error()
        }
    }
}
