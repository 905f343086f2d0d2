//! Checkout form validation.
//!
//! Every rule is checked on every call so a rejected form reports all of its
//! problems at once.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use thiserror::Error;

use crate::domain::{
    checkout::form::{ApprovedForm, CheckoutForm},
    orders::models::CustomerType,
};

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_DIGITS: usize = 10;
const PHONE_PREFIXES: [&str; 3] = ["+7", "7", "8"];
const MIN_ADDRESS_CHARS: usize = 10;
const BIN_DIGITS: usize = 12;

#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$").expect("valid email pattern")
});

/// One violated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    /// Request field name, as the client spells it.
    pub field: &'static str,
    pub message: &'static str,
}

/// All rules a form violated, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct ValidationErrors(SmallVec<[FieldError; 4]>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any violation was reported for `field`.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "checkout form is invalid:")?;

        for error in &self.0 {
            write!(f, " {}: {};", error.field, error.message)?;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Check `form` against the checkout rules.
///
/// # Errors
///
/// Returns every violated rule when at least one fails.
pub fn validate(form: CheckoutForm) -> Result<ApprovedForm, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if form.name.chars().count() < MIN_NAME_CHARS {
        errors.push("name", "name must be at least 2 characters");
    }

    if digits(&form.phone) < MIN_PHONE_DIGITS {
        errors.push("phone", "phone must contain at least 10 digits");
    } else if !PHONE_PREFIXES
        .iter()
        .any(|prefix| form.phone.starts_with(prefix))
    {
        errors.push("phone", "phone must start with +7, 7 or 8");
    }

    if !EMAIL.is_match(&form.email) {
        errors.push("email", "email is not a valid address");
    }

    if form.address.chars().count() < MIN_ADDRESS_CHARS {
        errors.push("address", "address must be at least 10 characters");
    }

    if form.customer_type == CustomerType::Legal {
        if form
            .company_name
            .as_deref()
            .is_none_or(|name| name.trim().is_empty())
        {
            errors.push("companyName", "company name is required for legal entities");
        }

        match form.bin.as_deref() {
            None => errors.push("bin", "BIN is required for legal entities"),
            Some(bin) if digits(bin) != BIN_DIGITS => {
                errors.push("bin", "BIN must contain exactly 12 digits");
            }
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(ApprovedForm::new(form))
    } else {
        Err(errors)
    }
}

fn digits(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}
