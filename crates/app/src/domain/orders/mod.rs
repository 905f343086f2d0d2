//! Orders
//!
//! Durable record of placed orders. An order's items carry the price the
//! customer paid, fixed at the moment the order was written.

pub mod errors;
pub mod models;
pub mod number;
mod repositories;
mod store;

pub use errors::OrdersServiceError;
pub use store::{MockOrderStore, OrderStore, PgOrderStore};
