//! State

use std::sync::Arc;

use storefront_app::{
    context::AppContext,
    domain::{carts::CartsService, checkout::CheckoutService},
};

/// Services shared by every handler, injected into the depot.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) carts: Arc<dyn CartsService>,
    pub(crate) checkout: Arc<dyn CheckoutService>,
}

impl State {
    #[must_use]
    pub(crate) fn new(carts: Arc<dyn CartsService>, checkout: Arc<dyn CheckoutService>) -> Self {
        Self { carts, checkout }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self::new(app.carts, app.checkout))
    }
}
