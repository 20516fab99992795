//! HTTP API application wiring (Axum router + store wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: response envelopes and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use packforge_infra::InventoryStore;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// `prefix` is either empty or `/<version>`; inventory routes live under
/// `{prefix}/inventory`.
pub fn build_app(store: Arc<InventoryStore>, prefix: &str) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(prefix))
        .layer(
            ServiceBuilder::new()
                .layer(Extension(store))
                .layer(axum::middleware::from_fn(middleware::cors_middleware)),
        )
}
