//! Orders Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::{catalog::models::ProductUuid, orders::number::OrderNumber},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Who the order is placed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Individual,
    Legal,
}

impl CustomerType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Legal => "legal",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown customer type `{0}`")]
pub struct UnknownCustomerType(String);

impl FromStr for CustomerType {
    type Err = UnknownCustomerType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "legal" => Ok(Self::Legal),
            other => Err(UnknownCustomerType(other.to_string())),
        }
    }
}

/// Lifecycle state of an order. Orders are created as `New`; removing an
/// order deletes it outright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    New,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown order status `{0}`")]
pub struct UnknownOrderStatus(String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// Customer fields copied onto the order at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub customer_type: CustomerType,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub comment: Option<String>,
    pub company_name: Option<String>,
    pub bin: Option<String>,
}

/// One purchased product. The price is the one the customer saw in their
/// cart, never a later catalog price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub price_at_purchase: u64,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price_at_purchase
            .saturating_mul(u64::from(self.quantity))
    }
}

/// Order ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub order_number: OrderNumber,
    pub customer: CustomerDetails,
    pub total: u64,
    pub items: Vec<OrderItem>,
}

/// Stored order with its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub order_number: OrderNumber,
    pub customer: CustomerDetails,
    pub total: u64,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// The stored form of `order`, stamped at `created_at`.
    #[must_use]
    pub fn placed(order: NewOrder, created_at: Timestamp) -> Self {
        Self {
            uuid: order.uuid,
            order_number: order.order_number,
            customer: order.customer,
            total: order.total,
            status: OrderStatus::New,
            created_at,
            items: order.items,
        }
    }
}
