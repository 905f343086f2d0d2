//! Server configuration module

use clap::Parser;

use storefront_app::context::AppSettings;

use crate::config::{
    app::CheckoutConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod app;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Cart and checkout settings.
    #[command(flatten)]
    pub checkout: CheckoutConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings handed to the application layer.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            database_url: self.database.database_url.clone(),
            max_connections: self.database.max_connections,
            cart_durability: self.checkout.cart_persistence.into(),
            timeouts: self.checkout.timeouts(),
            order_number_attempts: self.checkout.order_number_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use storefront_app::context::CartDurability;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_the_database_is_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "storefront-json",
            "--database-url",
            "postgres://localhost/storefront",
        ])?;

        let settings = config.app_settings();

        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
        assert_eq!(settings.max_connections, 25);
        assert_eq!(settings.cart_durability, CartDurability::Memory);
        assert_eq!(settings.timeouts.catalog, Duration::from_millis(2_000));
        assert_eq!(settings.timeouts.order_store, Duration::from_millis(5_000));
        assert_eq!(settings.order_number_attempts, 5);

        Ok(())
    }

    #[test]
    fn postgres_carts_can_be_selected() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "storefront-json",
            "--database-url",
            "postgres://localhost/storefront",
            "--cart-persistence",
            "postgres",
            "--order-number-attempts",
            "9",
        ])?;

        let settings = config.app_settings();

        assert_eq!(settings.cart_durability, CartDurability::Postgres);
        assert_eq!(settings.order_number_attempts, 9);

        Ok(())
    }
}
