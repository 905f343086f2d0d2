//! Carts
//!
//! Per-session carts. Every read-modify-write of a session's cart runs under
//! that session's lock; different sessions never wait on each other.

pub mod errors;
pub mod models;
mod persistence;
mod repository;
pub mod service;
pub mod session;
mod store;

pub use errors::CartsServiceError;
pub use persistence::{CartPersistence, EphemeralCarts, MockCartPersistence, PgCartPersistence};
pub use service::*;
pub use session::SessionId;
pub use store::{CartGuard, CartStore};
