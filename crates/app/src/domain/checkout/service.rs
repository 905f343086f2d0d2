//! Order placement.
//!
//! A checkout runs entirely under the session's cart lock:
//!
//! ```text
//! Start -> Validating -> StockChecking -> Persisting -> CartClearing -> Done
//!   \___________\______________\___ Rejected | Failed
//! ```
//!
//! Once stock is confirmed, persisting and clearing run on their own task
//! that owns the cart lock. A caller that goes away after that point does not
//! stop the order from being written or the cart from being cleared.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use tokio::time;
use tracing::{Instrument, Span, error, info, warn};

use crate::{
    domain::{
        carts::{CartGuard, CartStore, SessionId},
        catalog::{CatalogReader, lookup_within},
        checkout::{
            errors::CheckoutError,
            form::CheckoutForm,
            validation::validate,
        },
        orders::{
            OrderStore, OrdersServiceError,
            models::{CustomerDetails, NewOrder, Order, OrderItem, OrderUuid},
            number::OrderNumber,
        },
    },
    timeouts::Timeouts,
};

/// Default number of order numbers drawn before giving up on a checkout.
pub const DEFAULT_ORDER_NUMBER_ATTEMPTS: u32 = 5;

/// Progress of one checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Start,
    Validating,
    StockChecking,
    Persisting,
    CartClearing,
    Done,
    Rejected,
    Failed,
}

impl CheckoutStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Validating => "validating",
            Self::StockChecking => "stock_checking",
            Self::Persisting => "persisting",
            Self::CartClearing => "cart_clearing",
            Self::Done => "done",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }

    fn enter(self) {
        Span::current().record("stage", self.as_str());
    }

    /// Terminal stage for a checkout that ended with `error`.
    fn after(error: &CheckoutError) -> Self {
        match error {
            CheckoutError::MissingSession
            | CheckoutError::EmptyCart
            | CheckoutError::Validation(_) => Self::Rejected,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub uuid: OrderUuid,
    pub order_number: OrderNumber,
    /// The cart's final total at the moment the order was written.
    pub total: u64,
}

impl From<&Order> for PlacedOrder {
    fn from(order: &Order) -> Self {
        Self {
            uuid: order.uuid,
            order_number: order.order_number.clone(),
            total: order.total,
        }
    }
}

/// Turns session carts into stored orders.
#[derive(Clone)]
pub struct OrderPlacementCoordinator {
    carts: Arc<CartStore>,
    catalog: Arc<dyn CatalogReader>,
    orders: Arc<dyn OrderStore>,
    timeouts: Timeouts,
    order_number_attempts: u32,
}

impl OrderPlacementCoordinator {
    #[must_use]
    pub fn new(
        carts: Arc<CartStore>,
        catalog: Arc<dyn CatalogReader>,
        orders: Arc<dyn OrderStore>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            carts,
            catalog,
            orders,
            timeouts,
            order_number_attempts: DEFAULT_ORDER_NUMBER_ATTEMPTS,
        }
    }

    /// How many order numbers to draw before a checkout fails. At least one.
    #[must_use]
    pub fn with_order_number_attempts(mut self, attempts: u32) -> Self {
        self.order_number_attempts = attempts.max(1);
        self
    }

    async fn checkout(
        &self,
        session: Option<SessionId>,
        form: CheckoutForm,
    ) -> Result<PlacedOrder, CheckoutError> {
        CheckoutStage::Start.enter();

        let session = session.ok_or(CheckoutError::MissingSession)?;

        Span::current().record("session_id", session.as_str());

        let guard = self.carts.lock(&session).await?;

        if guard.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        CheckoutStage::Validating.enter();

        let approved = validate(form)?;

        CheckoutStage::StockChecking.enter();

        self.confirm_stock(&guard).await?;

        let cart = guard.cart();
        let placement = Placement {
            orders: Arc::clone(&self.orders),
            customer: approved.into_customer(),
            items: cart
                .lines()
                .iter()
                .map(|line| OrderItem {
                    product_uuid: line.product_uuid,
                    quantity: line.quantity,
                    price_at_purchase: line.product.price,
                })
                .collect(),
            total: cart.total(),
            limit: self.timeouts.order_store,
            attempts: self.order_number_attempts,
        };

        tokio::spawn(placement.run(guard).instrument(Span::current()))
            .await
            .map_err(|_join| CheckoutError::Persistence(OrdersServiceError::Interrupted))?
    }

    /// Re-read every line's product and make sure the catalog can still cover it.
    async fn confirm_stock(&self, guard: &CartGuard) -> Result<(), CheckoutError> {
        for line in guard.cart().lines() {
            let product = lookup_within(
                self.catalog.as_ref(),
                line.product_uuid,
                self.timeouts.catalog,
            )
            .await?;

            if u64::from(line.quantity) > u64::from(product.stock) {
                warn!(
                    product_uuid = %line.product_uuid,
                    requested = line.quantity,
                    available = product.stock,
                    "cart line exceeds current stock"
                );

                return Err(CheckoutError::InsufficientStock {
                    product: line.product_uuid,
                    requested: u64::from(line.quantity),
                    available: product.stock,
                });
            }
        }

        Ok(())
    }

    async fn within<T>(
        &self,
        call: impl Future<Output = Result<T, OrdersServiceError>>,
    ) -> Result<T, OrdersServiceError> {
        time::timeout(self.timeouts.order_store, call)
            .await
            .map_err(|_elapsed| OrdersServiceError::TimedOut)?
    }
}

impl fmt::Debug for OrderPlacementCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderPlacementCoordinator")
            .field("carts", &self.carts)
            .field("timeouts", &self.timeouts)
            .field("order_number_attempts", &self.order_number_attempts)
            .finish_non_exhaustive()
    }
}

/// Everything needed to write the order and clear the cart, owned so it can
/// outlive the request that started it.
struct Placement {
    orders: Arc<dyn OrderStore>,
    customer: CustomerDetails,
    items: Vec<OrderItem>,
    total: u64,
    limit: Duration,
    attempts: u32,
}

impl Placement {
    async fn run(self, mut guard: CartGuard) -> Result<PlacedOrder, CheckoutError> {
        CheckoutStage::Persisting.enter();

        let order = self.insert().await?;

        Span::current().record("order_uuid", tracing::field::display(order.uuid));
        Span::current().record("order_number", order.order_number.as_str());

        CheckoutStage::CartClearing.enter();

        // The order is committed; a cart that fails to clear is left for the
        // customer to empty and must not fail the checkout.
        if let Err(error) = guard.clear().await {
            error!(%error, session_id = %guard.session(), "failed to clear cart after checkout");
        }

        Ok(PlacedOrder::from(&order))
    }

    /// Write the order, drawing a fresh order number whenever the drawn one
    /// is already taken.
    async fn insert(&self) -> Result<Order, CheckoutError> {
        let uuid = OrderUuid::new();
        let mut attempt = 1;

        loop {
            let order = NewOrder {
                uuid,
                order_number: OrderNumber::random(),
                customer: self.customer.clone(),
                total: self.total,
                items: self.items.clone(),
            };

            let result = time::timeout(self.limit, self.orders.insert_order(order))
                .await
                .map_err(|_elapsed| OrdersServiceError::TimedOut)
                .and_then(|inserted| inserted);

            match result {
                Ok(order) => return Ok(order),
                Err(OrdersServiceError::DuplicateOrderNumber) if attempt < self.attempts => {
                    warn!(attempt, "order number already taken, drawing another");

                    attempt += 1;
                }
                Err(error @ (OrdersServiceError::TimedOut | OrdersServiceError::Sql(_))) => {
                    return self.reconcile(uuid, error).await;
                }
                Err(error) => return Err(CheckoutError::Persistence(error)),
            }
        }
    }

    /// A write that timed out or lost its connection may still have committed.
    /// The order's uuid is fixed across attempts, so look it up before
    /// reporting the failure and leaving the cart for a second checkout.
    async fn reconcile(
        &self,
        uuid: OrderUuid,
        error: OrdersServiceError,
    ) -> Result<Order, CheckoutError> {
        match time::timeout(self.limit, self.orders.get_order(uuid)).await {
            Ok(Ok(order)) => {
                warn!(
                    order_uuid = %uuid,
                    %error,
                    "order write reported a failure but the order was committed"
                );

                Ok(order)
            }
            Ok(Err(_)) | Err(_) => Err(CheckoutError::Persistence(error)),
        }
    }
}

#[async_trait]
impl CheckoutService for OrderPlacementCoordinator {
    #[tracing::instrument(
        name = "checkout.service.place_order",
        skip(self, form),
        fields(
            customer_type = %form.customer_type,
            session_id = tracing::field::Empty,
            stage = tracing::field::Empty,
            order_uuid = tracing::field::Empty,
            order_number = tracing::field::Empty,
        ),
        err
    )]
    async fn place_order(
        &self,
        session: Option<SessionId>,
        form: CheckoutForm,
    ) -> Result<PlacedOrder, CheckoutError> {
        let result = self.checkout(session, form).await;

        match &result {
            Ok(placed) => {
                CheckoutStage::Done.enter();

                info!(
                    order_uuid = %placed.uuid,
                    order_number = %placed.order_number,
                    total = placed.total,
                    "placed order"
                );
            }
            Err(error) => {
                let stage = CheckoutStage::after(error);

                stage.enter();

                warn!(%stage, reason = error.reason(), "checkout did not complete");
            }
        }

        result
    }

    #[tracing::instrument(
        name = "checkout.service.get_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn get_order(&self, order: OrderUuid) -> Result<Order, CheckoutError> {
        Ok(self.within(self.orders.get_order(order)).await?)
    }

    #[tracing::instrument(
        name = "checkout.service.delete_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn delete_order(&self, order: OrderUuid) -> Result<(), CheckoutError> {
        let rows_affected = self.within(self.orders.delete_order(order)).await?;

        if rows_affected == 0 {
            return Err(CheckoutError::OrderNotFound);
        }

        info!("deleted order");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Turn the session's cart into an order and empty the cart.
    async fn place_order(
        &self,
        session: Option<SessionId>,
        form: CheckoutForm,
    ) -> Result<PlacedOrder, CheckoutError>;

    /// A stored order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, CheckoutError>;

    /// Remove an order and its items.
    async fn delete_order(&self, order: OrderUuid) -> Result<(), CheckoutError>;
}
