//! Order store.

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{NewOrder, Order, OrderUuid},
        repositories::{PgOrderItemsRepository, PgOrdersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrderStore {
    db: Db,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
}

impl PgOrderStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
        }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    #[tracing::instrument(
        name = "orders.store.insert_order",
        skip(self, order),
        fields(
            order_uuid = %order.uuid,
            order_number = %order.order_number,
            item_count = order.items.len(),
        ),
        err
    )]
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created_at = self.orders.create_order(&mut tx, &order).await?;

        for (position, item) in order.items.iter().enumerate() {
            self.items
                .create_order_item(&mut tx, order.uuid, position, item)
                .await?;
        }

        tx.commit().await?;

        info!(total = order.total, "inserted order");

        Ok(Order::placed(order, created_at))
    }

    #[tracing::instrument(
        name = "orders.store.get_order",
        skip(self),
        fields(order_uuid = %order, order_number = tracing::field::Empty),
        err
    )]
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut found = self.orders.get_order(&mut tx, order).await?;

        found.items = self.items.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        Span::current().record("order_number", found.order_number.as_str());

        Ok(found)
    }

    #[tracing::instrument(
        name = "orders.store.delete_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn delete_order(&self, order: OrderUuid) -> Result<u64, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.orders.delete_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(rows_affected)
    }
}

/// Durable home of placed orders.
#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Write the order and all of its items in one transaction.
    ///
    /// Either everything is committed or nothing is.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Order with its items in purchase order.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Delete the order and its items, returning the number of orders removed.
    async fn delete_order(&self, order: OrderUuid) -> Result<u64, OrdersServiceError>;
}
