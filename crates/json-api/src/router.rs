//! App Router

use salvo::Router;

use crate::{carts, orders};

/// Routes served under `/api/v1`.
pub(crate) fn api_router() -> Router {
    Router::with_path("api/v1")
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .post(carts::add::handler)
                .delete(carts::clear::handler)
                .push(
                    Router::with_path("{product}")
                        .patch(carts::items::update::handler)
                        .delete(carts::items::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .delete(orders::delete::handler),
                ),
        )
}
