//! Cart Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    carts::{
        models::{CartLine, ProductSnapshot},
        session::SessionId,
    },
    catalog::models::ProductUuid,
};

const GET_CART_ITEMS_SQL: &str = include_str!("sql/get_cart_items.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("sql/create_cart_item.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("sql/delete_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: &SessionId,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(GET_CART_ITEMS_SQL)
            .bind(session.as_str())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: &SessionId,
        position: usize,
        line: &CartLine,
    ) -> Result<(), sqlx::Error> {
        let position = i32::try_from(position).map_err(|e| encode_error("position", e))?;
        let quantity = i32::try_from(line.quantity).map_err(|e| encode_error("quantity", e))?;
        let price = i64::try_from(line.product.price).map_err(|e| encode_error("price", e))?;

        query(CREATE_CART_ITEM_SQL)
            .bind(session.as_str())
            .bind(line.product_uuid.into_uuid())
            .bind(position)
            .bind(quantity)
            .bind(&line.product.name)
            .bind(&line.product.sku)
            .bind(price)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: &SessionId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEMS_SQL)
            .bind(session.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn encode_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::Encode(format!("{column}: {source}").into())
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity_i32: i32 = row.try_get("quantity")?;
        let price_i64: i64 = row.try_get("price")?;

        let quantity = u32::try_from(quantity_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        let price = u64::try_from(price_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity,
            product: ProductSnapshot {
                name: row.try_get("name")?,
                sku: row.try_get("sku")?,
                price,
            },
        })
    }
}
