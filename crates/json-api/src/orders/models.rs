//! Order Requests & Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    checkout::{CheckoutForm, PlacedOrder, ValidationErrors},
    orders::models::{CustomerType, Order, OrderItem},
};

/// Customer Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CustomerKind {
    /// A private person
    Individual,

    /// A registered company; requires company name and BIN
    Legal,
}

impl From<CustomerKind> for CustomerType {
    fn from(kind: CustomerKind) -> Self {
        match kind {
            CustomerKind::Individual => Self::Individual,
            CustomerKind::Legal => Self::Legal,
        }
    }
}

impl From<CustomerType> for CustomerKind {
    fn from(customer_type: CustomerType) -> Self {
        match customer_type {
            CustomerType::Individual => Self::Individual,
            CustomerType::Legal => Self::Legal,
        }
    }
}

/// Checkout Request
///
/// Missing text fields arrive as empty strings so that they are reported
/// alongside every other invalid field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutRequest {
    pub customer_type: CustomerKind,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub comment: Option<String>,

    /// Required for legal customers
    #[serde(default)]
    pub company_name: Option<String>,

    /// 12-digit business identification number, required for legal customers
    #[serde(default)]
    pub bin: Option<String>,
}

impl From<CheckoutRequest> for CheckoutForm {
    fn from(request: CheckoutRequest) -> Self {
        CheckoutForm {
            customer_type: request.customer_type.into(),
            name: request.name,
            phone: request.phone,
            email: request.email,
            address: request.address,
            comment: request.comment,
            company_name: request.company_name,
            bin: request.bin,
        }
    }
}

/// Order Placed Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderPlacedResponse {
    pub success: bool,
    pub order_id: Uuid,
    pub order_number: String,

    /// Amount charged, in minor units
    pub total: u64,
}

impl From<PlacedOrder> for OrderPlacedResponse {
    fn from(placed: PlacedOrder) -> Self {
        Self {
            success: true,
            order_id: placed.uuid.into_uuid(),
            order_number: placed.order_number.to_string(),
            total: placed.total,
        }
    }
}

/// Validation Error Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidationErrorResponse {
    /// Always `VALIDATION_ERROR`
    pub error: String,

    /// One entry per violated rule, in field order
    pub details: Vec<FieldErrorResponse>,
}

impl From<&ValidationErrors> for ValidationErrorResponse {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            error: "VALIDATION_ERROR".to_owned(),
            details: errors
                .iter()
                .map(|error| FieldErrorResponse {
                    field: error.field.to_owned(),
                    message: error.message.to_owned(),
                })
                .collect(),
        }
    }
}

/// Field Error Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub customer_type: CustomerKind,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub comment: Option<String>,
    pub company_name: Option<String>,
    pub bin: Option<String>,
    pub total: u64,
    pub status: String,

    /// When the order was written
    pub created_at: String,

    pub items: Vec<OrderItemResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let customer = order.customer;

        Self {
            order_id: order.uuid.into_uuid(),
            order_number: order.order_number.to_string(),
            customer_type: customer.customer_type.into(),
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            address: customer.address,
            comment: customer.comment,
            company_name: customer.company_name,
            bin: customer.bin,
            total: order.total,
            status: order.status.as_str().to_owned(),
            created_at: order.created_at.to_string(),
            items: order.items.iter().map(OrderItemResponse::from).collect(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub product_id: Uuid,
    pub quantity: u32,

    /// Unit price the customer paid
    pub price_at_purchase: u64,

    pub line_total: u64,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_uuid.into_uuid(),
            quantity: item.quantity,
            price_at_purchase: item.price_at_purchase,
            line_total: item.line_total(),
        }
    }
}
