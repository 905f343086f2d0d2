//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::TypedUuid;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Add Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddItemRequest {
    pub product_id: Uuid,

    /// Units to add; one when omitted
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Add Cart Item Handler
///
/// Adds units of a product, merging with an existing line for it.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Item",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart", body = CartResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or insufficient stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Catalog unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = req.session_id_or_new(res)?;
    let request = json.into_inner();

    let cart = state
        .carts
        .add_item(
            session,
            TypedUuid::from_uuid(request.product_id),
            request.quantity.unwrap_or(1),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse::from(&cart)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{cart_with, carts_service, session_header, snapshot};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").post(handler))
    }

    #[tokio::test]
    async fn adds_the_requested_quantity() -> TestResult {
        let product = Uuid::now_v7();
        let cart = cart_with(&[(snapshot("Lamp", 12_500), 3)]);

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |session, p, quantity| {
                session.as_str() == "s-1" && p.into_uuid() == product && *quantity == 3
            })
            .return_once(move |_, _, _| Ok(cart));

        let mut res = TestClient::post("http://example.com/cart")
            .add_header(SESSION_ID_HEADER, "s-1", true)
            .json(&json!({ "productId": product, "quantity": 3 }))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.count, 3);
        assert_eq!(body.total, 37_500);

        Ok(())
    }

    #[tokio::test]
    async fn omitted_quantity_adds_one_and_mints_a_session() -> TestResult {
        let product = Uuid::now_v7();
        let cart = cart_with(&[(snapshot("Lamp", 12_500), 1)]);

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |_, p, quantity| p.into_uuid() == product && *quantity == 1)
            .return_once(move |_, _, _| Ok(cart));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": product }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(session_header(&res).is_some(), "expected a minted session id");

        Ok(())
    }

    #[tokio::test]
    async fn explicit_zero_quantity_is_rejected() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(|_, _, quantity| *quantity == 0)
            .return_once(|_, _, _| Err(CartsServiceError::InvalidQuantity));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": Uuid::now_v7(), "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn unknown_product_returns_404() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::ProductNotFound));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": Uuid::now_v7() }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn catalog_outage_returns_503() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::CatalogUnavailable));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": Uuid::now_v7() }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn malformed_body_never_reaches_the_service() {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().never();

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": "not-a-uuid", "quantity": -1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
