//! Cart & Checkout Config

use std::time::Duration;

use clap::{Args, ValueEnum};

use storefront_app::{
    context::CartDurability, domain::checkout::DEFAULT_ORDER_NUMBER_ATTEMPTS, timeouts::Timeouts,
};

/// Where session carts are kept.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CartPersistence {
    /// In process memory; carts vanish on restart.
    Memory,

    /// Mirrored to the `cart_items` table.
    Postgres,
}

impl From<CartPersistence> for CartDurability {
    fn from(persistence: CartPersistence) -> Self {
        match persistence {
            CartPersistence::Memory => Self::Memory,
            CartPersistence::Postgres => Self::Postgres,
        }
    }
}

/// Cart and checkout settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Cart storage (memory, postgres)
    #[arg(long, env = "CART_PERSISTENCE", value_enum, default_value_t = CartPersistence::Memory)]
    pub cart_persistence: CartPersistence,

    /// Deadline for a single catalog lookup.
    #[arg(long, env = "CATALOG_TIMEOUT_MS", default_value_t = 2_000_u64)]
    pub catalog_timeout_ms: u64,

    /// Deadline for one order store transaction.
    #[arg(long, env = "ORDER_STORE_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub order_store_timeout_ms: u64,

    /// How many order numbers to draw before giving up on a checkout.
    #[arg(long, env = "ORDER_NUMBER_ATTEMPTS", default_value_t = DEFAULT_ORDER_NUMBER_ATTEMPTS)]
    pub order_number_attempts: u32,
}

impl CheckoutConfig {
    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            catalog: Duration::from_millis(self.catalog_timeout_ms),
            order_store: Duration::from_millis(self.order_store_timeout_ms),
        }
    }
}
