//! Cart persistence backends.
//!
//! Carts always live in the process; a backend decides whether they also
//! survive a restart.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::carts::{models::CartLine, repository::PgCartItemsRepository, session::SessionId},
};

#[automock]
#[async_trait]
pub trait CartPersistence: Send + Sync {
    /// Lines stored for `session`, in insertion order.
    async fn load(&self, session: &SessionId) -> Result<Vec<CartLine>, sqlx::Error>;

    /// Replace everything stored for `session` with `lines`.
    async fn save(&self, session: &SessionId, lines: &[CartLine]) -> Result<(), sqlx::Error>;
}

/// Keeps nothing: carts are lost when the process exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct EphemeralCarts;

#[async_trait]
impl CartPersistence for EphemeralCarts {
    async fn load(&self, _session: &SessionId) -> Result<Vec<CartLine>, sqlx::Error> {
        Ok(Vec::new())
    }

    async fn save(&self, _session: &SessionId, _lines: &[CartLine]) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

/// Stores cart lines in `cart_items`, one row per (session, product).
#[derive(Debug, Clone)]
pub struct PgCartPersistence {
    db: Db,
    items: PgCartItemsRepository,
}

impl PgCartPersistence {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            items: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartPersistence for PgCartPersistence {
    #[tracing::instrument(name = "carts.persistence.load", skip(self), fields(session_id = %session), err)]
    async fn load(&self, session: &SessionId) -> Result<Vec<CartLine>, sqlx::Error> {
        let mut tx = self.db.begin_transaction().await?;

        let lines = self.items.get_cart_items(&mut tx, session).await?;

        tx.commit().await?;

        Ok(lines)
    }

    #[tracing::instrument(
        name = "carts.persistence.save",
        skip(self, lines),
        fields(session_id = %session, line_count = lines.len()),
        err
    )]
    async fn save(&self, session: &SessionId, lines: &[CartLine]) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin_transaction().await?;

        self.items.delete_cart_items(&mut tx, session).await?;

        for (position, line) in lines.iter().enumerate() {
            self.items
                .create_cart_item(&mut tx, session, position, line)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
