//! Cart Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::{Cart, CartLine};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    /// Lines in the order they were first added
    pub items: Vec<CartLineResponse>,

    /// Sum of line totals, in minor units
    pub subtotal: u64,

    /// Discount applied to the subtotal, in minor units
    pub discount: u64,

    /// Amount payable, in minor units
    pub total: u64,

    /// Units across all lines
    pub count: u64,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartLineResponse::from).collect(),
            subtotal: cart.subtotal(),
            discount: cart.discount(),
            total: cart.total(),
            count: cart.item_count(),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineResponse {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,

    /// Unit price captured when the line was added
    pub price: u64,

    pub quantity: u32,

    pub line_total: u64,
}

impl From<&CartLine> for CartLineResponse {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_uuid.into_uuid(),
            name: line.product.name.clone(),
            sku: line.product.sku.clone(),
            price: line.product.price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}
