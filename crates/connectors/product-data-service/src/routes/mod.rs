mod get_health;
mod get_metrics;
mod get_product;
mod get_skus;
mod post_skus;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::state::ServerState;

pub use get_health::get_health;
pub use get_metrics::get_metrics;
pub use get_product::get_product;
pub use get_skus::get_skus;
pub use post_skus::post_skus;

/// Build the router. Request bodies larger than `body_limit` bytes are refused with `413`.
pub fn create_router(state: ServerState, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(get_health))
        .route("/skus", get(get_skus).post(post_skus))
        .route("/productid/:product_id", get(get_product))
        .route("/metrics", get(get_metrics))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
}
