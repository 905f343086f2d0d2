//! Session carts, checkout and order storage for the storefront.

pub mod context;
pub mod database;
pub mod domain;
pub mod timeouts;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
