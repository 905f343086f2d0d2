//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use storefront_app::{
    TypedUuid,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartLine, ProductSnapshot},
        },
        checkout::MockCheckoutService,
        orders::{
            models::{CustomerDetails, CustomerType, Order, OrderItem, OrderStatus},
            number::OrderNumber,
        },
    },
};

use crate::{extensions::SESSION_ID_HEADER, state::State};

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item_quantity().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();

    carts
}

fn strict_checkout_mock() -> MockCheckoutService {
    let mut checkout = MockCheckoutService::new();

    checkout.expect_place_order().never();
    checkout.expect_get_order().never();
    checkout.expect_delete_order().never();

    checkout
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    service_with(
        Arc::new(State::new(Arc::new(carts), Arc::new(strict_checkout_mock()))),
        route,
    )
}

pub(crate) fn checkout_service(checkout: MockCheckoutService, route: Router) -> Service {
    service_with(
        Arc::new(State::new(Arc::new(strict_carts_mock()), Arc::new(checkout))),
        route,
    )
}

fn service_with(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn session_header(res: &Response) -> Option<String> {
    res.headers()
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

pub(crate) fn snapshot(name: &str, price: u64) -> ProductSnapshot {
    ProductSnapshot {
        name: name.to_owned(),
        sku: format!("SKU-{}", name.to_uppercase()),
        price,
    }
}

pub(crate) fn cart_with(lines: &[(ProductSnapshot, u32)]) -> Cart {
    Cart::from_lines(lines.iter().map(|(product, quantity)| CartLine {
        product_uuid: TypedUuid::new(),
        quantity: *quantity,
        product: product.clone(),
    }))
}

pub(crate) fn make_order() -> Order {
    Order {
        uuid: TypedUuid::new(),
        order_number: OrderNumber::new(2026, 7),
        customer: CustomerDetails {
            customer_type: CustomerType::Individual,
            name: "Aigerim Bekova".to_owned(),
            phone: "+77011234567".to_owned(),
            email: "aigerim@example.com".to_owned(),
            address: "12 Abay Avenue, Almaty".to_owned(),
            comment: None,
            company_name: None,
            bin: None,
        },
        total: 12_500,
        status: OrderStatus::New,
        created_at: Timestamp::UNIX_EPOCH,
        items: vec![OrderItem {
            product_uuid: TypedUuid::new(),
            quantity: 1,
            price_at_purchase: 12_500,
        }],
    }
}
