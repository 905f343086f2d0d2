//! Checkout Form

use crate::domain::orders::models::{CustomerDetails, CustomerType};

/// Customer details submitted at checkout, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer_type: CustomerType,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub comment: Option<String>,
    pub company_name: Option<String>,
    pub bin: Option<String>,
}

/// A form that passed every checkout rule.
///
/// Only [`validate`](super::validate) produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedForm(CheckoutForm);

impl ApprovedForm {
    pub(super) fn new(form: CheckoutForm) -> Self {
        Self(form)
    }

    #[must_use]
    pub fn customer_type(&self) -> CustomerType {
        self.0.customer_type
    }

    /// The customer fields to copy onto the order.
    #[must_use]
    pub fn into_customer(self) -> CustomerDetails {
        let form = self.0;

        CustomerDetails {
            customer_type: form.customer_type,
            name: form.name,
            phone: form.phone,
            email: form.email,
            address: form.address,
            comment: form.comment,
            company_name: form.company_name,
            bin: form.bin,
        }
    }
}
