//! Catalog reader.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use tokio::time;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogError,
        models::{Product, ProductUuid},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogReader {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogReader {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogReader for PgCatalogReader {
    #[tracing::instrument(
        name = "catalog.lookup",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn lookup(&self, product: ProductUuid) -> Result<Product, CatalogError> {
        let mut conn = self.db.pool().acquire().await?;

        let product = self.repository.get_product(&mut conn, product).await?;

        Ok(product)
    }
}

#[automock]
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Fetch the current price, stock and attributes of a product.
    async fn lookup(&self, product: ProductUuid) -> Result<Product, CatalogError>;
}

/// Look a product up, surfacing [`CatalogError::Unavailable`] when the
/// catalog does not answer within `limit`.
pub(crate) async fn lookup_within(
    catalog: &dyn CatalogReader,
    product: ProductUuid,
    limit: Duration,
) -> Result<Product, CatalogError> {
    time::timeout(limit, catalog.lookup(product))
        .await
        .map_err(|_elapsed| CatalogError::Unavailable)?
}
