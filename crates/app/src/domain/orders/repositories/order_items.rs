//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    catalog::models::ProductUuid,
    orders::{
        models::{OrderItem, OrderUuid},
        repositories::{decode_error, encode_error},
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: usize,
        item: &OrderItem,
    ) -> Result<(), sqlx::Error> {
        let position = i32::try_from(position).map_err(|e| encode_error("position", e))?;
        let quantity = i32::try_from(item.quantity).map_err(|e| encode_error("quantity", e))?;
        let price = i64::try_from(item.price_at_purchase)
            .map_err(|e| encode_error("price_at_purchase", e))?;

        query(CREATE_ORDER_ITEM_SQL)
            .bind(order.into_uuid())
            .bind(position)
            .bind(item.product_uuid.into_uuid())
            .bind(quantity)
            .bind(price)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity_i32: i32 = row.try_get("quantity")?;
        let price_i64: i64 = row.try_get("price_at_purchase")?;

        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: u32::try_from(quantity_i32).map_err(|e| decode_error("quantity", e))?,
            price_at_purchase: u64::try_from(price_i64)
                .map_err(|e| decode_error("price_at_purchase", e))?,
        })
    }
}
