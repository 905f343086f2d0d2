//! Checkout
//!
//! Validates the customer's form and turns the session's cart into an order.

pub mod errors;
pub mod form;
mod service;
pub mod validation;

pub use errors::CheckoutError;
pub use form::{ApprovedForm, CheckoutForm};
pub use service::*;
pub use validation::{FieldError, ValidationErrors, validate};
