//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{
            CartPersistence, CartStore, CartsService, EphemeralCarts, PgCartPersistence,
            SessionCartsService,
        },
        catalog::{CatalogReader, PgCatalogReader},
        checkout::{CheckoutService, DEFAULT_ORDER_NUMBER_ATTEMPTS, OrderPlacementCoordinator},
        orders::{OrderStore, PgOrderStore},
    },
    timeouts::Timeouts,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Where carts live between requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CartDurability {
    /// Process memory only; carts are lost on restart.
    #[default]
    Memory,

    /// Mirrored to the `cart_items` table and reloaded on first access.
    Postgres,
}

/// Settings the application layer needs to build its services.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub cart_durability: CartDurability,
    pub timeouts: Timeouts,
    pub order_number_attempts: u32,
}

impl AppSettings {
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: database::DEFAULT_MAX_CONNECTIONS,
            cart_durability: CartDurability::default(),
            timeouts: Timeouts::default(),
            order_number_attempts: DEFAULT_ORDER_NUMBER_ATTEMPTS,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub checkout: Arc<dyn CheckoutService>,
}

impl AppContext {
    /// Build application context from settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_settings(settings: &AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database_url, settings.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(Db::new(pool), settings))
    }

    /// Wire every service against `db`. One cart store is shared by the cart
    /// operations and checkout so both see the same per-session locks.
    #[must_use]
    pub fn from_db(db: Db, settings: &AppSettings) -> Self {
        let persistence: Arc<dyn CartPersistence> = match settings.cart_durability {
            CartDurability::Memory => Arc::new(EphemeralCarts),
            CartDurability::Postgres => Arc::new(PgCartPersistence::new(db.clone())),
        };

        let store = Arc::new(CartStore::new(persistence));
        let catalog: Arc<dyn CatalogReader> = Arc::new(PgCatalogReader::new(db.clone()));
        let orders: Arc<dyn OrderStore> = Arc::new(PgOrderStore::new(db));

        Self {
            carts: Arc::new(SessionCartsService::new(
                Arc::clone(&store),
                Arc::clone(&catalog),
                settings.timeouts,
            )),
            checkout: Arc::new(
                OrderPlacementCoordinator::new(store, catalog, orders, settings.timeouts)
                    .with_order_number_attempts(settings.order_number_attempts),
            ),
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
