//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    domain::{
        carts::{errors::CartsServiceError, models::Cart, session::SessionId, store::CartStore},
        catalog::{CatalogReader, lookup_within, models::ProductUuid},
    },
    timeouts::Timeouts,
};

/// Cart operations backed by a [`CartStore`] and the catalog.
#[derive(Clone)]
pub struct SessionCartsService {
    store: Arc<CartStore>,
    catalog: Arc<dyn CatalogReader>,
    timeouts: Timeouts,
}

impl SessionCartsService {
    #[must_use]
    pub fn new(store: Arc<CartStore>, catalog: Arc<dyn CatalogReader>, timeouts: Timeouts) -> Self {
        Self {
            store,
            catalog,
            timeouts,
        }
    }
}

impl std::fmt::Debug for SessionCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCartsService")
            .field("store", &self.store)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CartsService for SessionCartsService {
    async fn get_cart(&self, session: SessionId) -> Result<Cart, CartsServiceError> {
        let guard = self.store.lock(&session).await?;

        Ok(guard.cart().clone())
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self),
        fields(session_id = %session, product_uuid = %product),
        err
    )]
    async fn add_item(
        &self,
        session: SessionId,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let product = lookup_within(self.catalog.as_ref(), product, self.timeouts.catalog).await?;

        let mut guard = self.store.lock(&session).await?;

        let requested = u64::from(guard.cart().quantity_of(product.uuid)) + u64::from(quantity);

        if requested > u64::from(product.stock) {
            return Err(CartsServiceError::InsufficientStock {
                product: product.uuid,
                requested,
                available: product.stock,
            });
        }

        let mut cart = guard.cart().clone();

        cart.merge(&product, quantity)?;

        let cart = guard.replace(cart).await?;

        info!(
            product_uuid = %product.uuid,
            quantity,
            item_count = cart.item_count(),
            "added item to cart"
        );

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.update_item_quantity",
        skip(self),
        fields(session_id = %session, product_uuid = %product),
        err
    )]
    async fn update_item_quantity(
        &self,
        session: SessionId,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut guard = self.store.lock(&session).await?;
        let mut cart = guard.cart().clone();

        cart.set_quantity(product, quantity)?;

        guard.replace(cart).await
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(session_id = %session, product_uuid = %product),
        err
    )]
    async fn remove_item(
        &self,
        session: SessionId,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut guard = self.store.lock(&session).await?;
        let mut cart = guard.cart().clone();

        cart.remove(product)?;

        guard.replace(cart).await
    }

    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self),
        fields(session_id = %session),
        err
    )]
    async fn clear_cart(&self, session: SessionId) -> Result<Cart, CartsServiceError> {
        let mut guard = self.store.lock(&session).await?;

        guard.clear().await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Current cart for the session; an empty one on first contact.
    async fn get_cart(&self, session: SessionId) -> Result<Cart, CartsServiceError>;

    /// Add units of a product, merging with any existing line.
    async fn add_item(
        &self,
        session: SessionId,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Replace the quantity of a product already in the cart.
    async fn update_item_quantity(
        &self,
        session: SessionId,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a product's line from the cart.
    async fn remove_item(
        &self,
        session: SessionId,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove every line from the cart.
    async fn clear_cart(&self, session: SessionId) -> Result<Cart, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::catalog::{CatalogError, MockCatalogReader},
        test::{catalog::FixedCatalog, fixtures::product},
    };

    use super::*;

    fn service_with(catalog: Arc<dyn CatalogReader>) -> SessionCartsService {
        SessionCartsService::new(
            Arc::new(CartStore::ephemeral()),
            catalog,
            Timeouts::default(),
        )
    }

    #[tokio::test]
    async fn get_cart_for_new_session_is_empty() -> TestResult {
        let service = service_with(Arc::new(FixedCatalog::default()));

        let cart = service.get_cart(SessionId::generate()).await?;

        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0);
        assert_eq!(cart.item_count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_snapshots_the_catalog_price() -> TestResult {
        let respirator = product("Respirator", 12_500, 100);
        let service = service_with(Arc::new(FixedCatalog::with([respirator.clone()])));

        let cart = service
            .add_item(SessionId::generate(), respirator.uuid, 2)
            .await?;

        let line = cart.line(respirator.uuid).expect("line for added product");

        assert_eq!(line.product.price, 12_500);
        assert_eq!(line.product.name, "Respirator");
        assert_eq!(cart.total(), 25_000);
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_product_twice_merges_quantities() -> TestResult {
        let gloves = product("Gloves", 5_000, 200);
        let service = service_with(Arc::new(FixedCatalog::with([gloves.clone()])));
        let session = SessionId::generate();

        service.add_item(session.clone(), gloves.uuid, 2).await?;

        let cart = service.add_item(session, gloves.uuid, 3).await?;

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(gloves.uuid), 5);

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_product_returns_product_not_found() {
        let mut catalog = MockCatalogReader::new();

        catalog
            .expect_lookup()
            .once()
            .return_once(|_| Err(CatalogError::NotFound));

        let service = service_with(Arc::new(catalog));

        let result = service
            .add_item(SessionId::generate(), ProductUuid::new(), 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_beyond_stock_after_merge_is_rejected() -> TestResult {
        let helmet = product("Helmet", 8_000, 3);
        let service = service_with(Arc::new(FixedCatalog::with([helmet.clone()])));
        let session = SessionId::generate();

        service.add_item(session.clone(), helmet.uuid, 2).await?;

        let result = service.add_item(session.clone(), helmet.uuid, 2).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock {
                    requested: 4,
                    available: 3,
                    ..
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let cart = service.get_cart(session).await?;

        assert_eq!(cart.quantity_of(helmet.uuid), 2);

        Ok(())
    }

    #[tokio::test]
    async fn add_zero_quantity_is_invalid() {
        let mut catalog = MockCatalogReader::new();

        catalog.expect_lookup().never();

        let service = service_with(Arc::new(catalog));

        let result = service
            .add_item(SessionId::generate(), ProductUuid::new(), 0)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_while_catalog_unavailable_surfaces_it() {
        let mut catalog = MockCatalogReader::new();

        catalog
            .expect_lookup()
            .once()
            .return_once(|_| Err(CatalogError::Unavailable));

        let service = service_with(Arc::new(catalog));

        let result = service
            .add_item(SessionId::generate(), ProductUuid::new(), 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::CatalogUnavailable)),
            "expected CatalogUnavailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_replaces_quantity() -> TestResult {
        let suit = product("Suit", 15_000, 50);
        let service = service_with(Arc::new(FixedCatalog::with([suit.clone()])));
        let session = SessionId::generate();

        service.add_item(session.clone(), suit.uuid, 5).await?;

        let cart = service
            .update_item_quantity(session, suit.uuid, 2)
            .await?;

        assert_eq!(cart.quantity_of(suit.uuid), 2);
        assert_eq!(cart.total(), 30_000);

        Ok(())
    }

    #[tokio::test]
    async fn update_missing_item_leaves_cart_unchanged() -> TestResult {
        let suit = product("Suit", 15_000, 50);
        let service = service_with(Arc::new(FixedCatalog::with([suit.clone()])));
        let session = SessionId::generate();

        let before = service.add_item(session.clone(), suit.uuid, 1).await?;

        let result = service
            .update_item_quantity(session.clone(), ProductUuid::new(), 4)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotInCart)),
            "expected ItemNotInCart, got {result:?}"
        );
        assert_eq!(service.get_cart(session).await?, before);

        Ok(())
    }

    #[tokio::test]
    async fn update_to_zero_is_invalid() {
        let service = service_with(Arc::new(FixedCatalog::default()));

        let result = service
            .update_item_quantity(SessionId::generate(), ProductUuid::new(), 0)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_item_drops_the_line() -> TestResult {
        let suit = product("Suit", 15_000, 50);
        let goggles = product("Goggles", 3_500, 50);
        let service = service_with(Arc::new(FixedCatalog::with([
            suit.clone(),
            goggles.clone(),
        ])));
        let session = SessionId::generate();

        service.add_item(session.clone(), suit.uuid, 1).await?;
        service.add_item(session.clone(), goggles.uuid, 2).await?;

        let cart = service.remove_item(session, suit.uuid).await?;

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(), 7_000);
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn remove_missing_item_returns_item_not_in_cart() {
        let service = service_with(Arc::new(FixedCatalog::default()));

        let result = service
            .remove_item(SessionId::generate(), ProductUuid::new())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotInCart)),
            "expected ItemNotInCart, got {result:?}"
        );
    }

    #[tokio::test]
    async fn clear_empties_the_cart() -> TestResult {
        let suit = product("Suit", 15_000, 50);
        let service = service_with(Arc::new(FixedCatalog::with([suit.clone()])));
        let session = SessionId::generate();

        service.add_item(session.clone(), suit.uuid, 3).await?;

        let cart = service.clear_cart(session.clone()).await?;

        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0);
        assert!(service.get_cart(session).await?.is_empty());

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_to_one_session_lose_nothing() -> TestResult {
        let first = product("Respirator", 12_500, 100);
        let second = product("Gloves", 5_000, 100);
        let service = Arc::new(service_with(Arc::new(
            FixedCatalog::with([first.clone(), second.clone()]).yielding(),
        )));
        let session = SessionId::generate();

        let add_first = {
            let service = Arc::clone(&service);
            let session = session.clone();

            tokio::spawn(async move { service.add_item(session, first.uuid, 1).await })
        };

        let add_second = {
            let service = Arc::clone(&service);
            let session = session.clone();

            tokio::spawn(async move { service.add_item(session, second.uuid, 2).await })
        };

        add_first.await??;
        add_second.await??;

        let cart = service.get_cart(session).await?;

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn many_concurrent_adds_of_one_product_sum_exactly() -> TestResult {
        let gloves = product("Gloves", 5_000, 1_000);
        let service = Arc::new(service_with(Arc::new(
            FixedCatalog::with([gloves.clone()]).yielding(),
        )));
        let session = SessionId::generate();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let service = Arc::clone(&service);
                let session = session.clone();

                tokio::spawn(async move { service.add_item(session, gloves.uuid, 1).await })
            })
            .collect();

        for task in tasks {
            task.await??;
        }

        let cart = service.get_cart(session).await?;

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(gloves.uuid), 50);
        assert_eq!(cart.total(), 250_000);

        Ok(())
    }
}
