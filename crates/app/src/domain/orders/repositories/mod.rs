mod order_items;
mod orders;

pub(crate) use order_items::PgOrderItemsRepository;
pub(crate) use orders::PgOrdersRepository;

fn encode_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::Encode(format!("{column}: {source}").into())
}

fn decode_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}
