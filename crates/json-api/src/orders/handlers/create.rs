//! Place Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use storefront_app::domain::checkout::CheckoutError;

use crate::{
    extensions::*,
    observability::{record_checkout_failure, record_order_placed},
    orders::{
        errors::into_status_error,
        models::{CheckoutRequest, OrderPlacedResponse, ValidationErrorResponse},
    },
    state::State,
};

/// Place Order Handler
///
/// Turns the session's cart into an order and empties the cart.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed", body = OrderPlacedResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid form, empty cart, missing session or insufficient stock", body = ValidationErrorResponse),
        (status_code = StatusCode::NOT_FOUND, description = "A product in the cart no longer exists"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Catalog unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let result = state
        .checkout
        .place_order(req.session_id(), json.into_inner().into())
        .await;

    match result {
        Ok(placed) => {
            record_order_placed();

            res.render(Json(OrderPlacedResponse::from(placed)));

            Ok(StatusCode::CREATED)
        }
        Err(CheckoutError::Validation(errors)) => {
            record_checkout_failure("validation");

            res.render(Json(ValidationErrorResponse::from(&errors)));

            Ok(StatusCode::BAD_REQUEST)
        }
        Err(error) => {
            record_checkout_failure(error.reason());

            Err(into_status_error(error))
        }
    }
}
