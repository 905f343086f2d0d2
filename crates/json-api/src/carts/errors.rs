//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::ItemNotInCart => {
            StatusError::not_found().brief("Product is not in the cart")
        }
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be greater than zero")
        }
        error @ CartsServiceError::InsufficientStock { .. } => StatusError::bad_request()
            .brief("Insufficient stock")
            .detail(error.to_string()),
        CartsServiceError::CatalogUnavailable => {
            StatusError::service_unavailable().brief("Catalog is unavailable")
        }
        CartsServiceError::Sql(source) => {
            error!("failed to update cart: {source}");

            StatusError::internal_server_error()
        }
    }
}
