//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::orders::{
    models::{CustomerDetails, NewOrder, Order, OrderStatus, OrderUuid},
    number::OrderNumber,
    repositories::{decode_error, encode_error},
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const DELETE_ORDER_SQL: &str = include_str!("../sql/delete_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the order row and return its creation time.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<Timestamp, sqlx::Error> {
        let total = i64::try_from(order.total).map_err(|e| encode_error("total", e))?;
        let customer = &order.customer;

        let created_at: SqlxTimestamp = query_scalar(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number.as_str())
            .bind(customer.customer_type.as_str())
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(&customer.email)
            .bind(customer.company_name.as_deref())
            .bind(customer.bin.as_deref())
            .bind(&customer.address)
            .bind(customer.comment.as_deref())
            .bind(total)
            .bind(OrderStatus::New.as_str())
            .fetch_one(&mut **tx)
            .await?;

        Ok(created_at.to_jiff())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

/// Items are loaded separately; the row carries only the order itself.
impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let total_i64: i64 = row.try_get("total")?;
        let customer_type: String = row.try_get("customer_type")?;
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: OrderNumber::from_stored(row.try_get("order_number")?),
            customer: CustomerDetails {
                customer_type: customer_type
                    .parse()
                    .map_err(|e| decode_error("customer_type", e))?,
                name: row.try_get("name")?,
                phone: row.try_get("phone")?,
                email: row.try_get("email")?,
                address: row.try_get("address")?,
                comment: row.try_get("comment")?,
                company_name: row.try_get("company_name")?,
                bin: row.try_get("bin")?,
            },
            total: u64::try_from(total_i64).map_err(|e| decode_error("total", e))?,
            status: status.parse().map_err(|e| decode_error("status", e))?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            items: Vec::new(),
        })
    }
}
