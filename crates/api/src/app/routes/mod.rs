use axum::{
    routing::{get, put},
    Router,
};

pub mod inventory;
pub mod system;

/// Inventory routes under `{prefix}/inventory`.
pub fn router(prefix: &str) -> Router {
    let base = format!("{prefix}/inventory");
    Router::new()
        .route(&base, get(inventory::list_inventory))
        .route(&format!("{base}/"), get(inventory::list_inventory))
        .route(&format!("{base}/:id"), put(inventory::replace_item_packs))
        .route(
            &format!("{base}/:id/order/:count"),
            get(inventory::process_order),
        )
}
