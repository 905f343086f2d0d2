//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::TypedUuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Returns a stored order with the prices its items were bought at.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order", body = OrderResponse),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .checkout
        .get_order(TypedUuid::from_uuid(order.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::checkout::{CheckoutError, MockCheckoutService};

    use crate::test_helpers::{checkout_service, make_order};

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        checkout_service(checkout, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn returns_the_order_with_its_items() -> TestResult {
        let order = make_order();
        let uuid = order.uuid;

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_get_order()
            .once()
            .withf(move |o| *o == uuid)
            .return_once(move |_| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(checkout))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.order_id, uuid.into_uuid());
        assert_eq!(body.status, "new");
        assert_eq!(body.items.len(), 1);
        assert_eq!(
            body.items.first().map(|item| item.price_at_purchase),
            Some(12_500)
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_returns_404() {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_get_order()
            .once()
            .return_once(|_| Err(CheckoutError::OrderNotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn malformed_id_returns_400() {
        let mut checkout = MockCheckoutService::new();

        checkout.expect_get_order().never();

        let res = TestClient::get("http://example.com/orders/not-a-uuid")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
