use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use packforge_infra::InventoryStore;
use packforge_inventory::Pack;

use crate::app::dto::{self, ResponseEnvelope};
use crate::app::errors;

pub async fn list_inventory(
    Extension(store): Extension<Arc<InventoryStore>>,
) -> axum::response::Response {
    (StatusCode::OK, Json(ResponseEnvelope::new(store.serialize()))).into_response()
}

pub async fn replace_item_packs(
    Extension(store): Extension<Arc<InventoryStore>>,
    Path(item_id): Path<String>,
    body: Result<Json<Vec<Pack>>, JsonRejection>,
) -> axum::response::Response {
    let Json(packs) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_body",
                rejection.body_text(),
            );
        }
    };

    match store.replace(&item_id, packs) {
        Ok(_) => (StatusCode::OK, Json(ResponseEnvelope::new(store.serialize()))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn process_order(
    Extension(store): Extension<Arc<InventoryStore>>,
    Path((item_id, raw_count)): Path<(String, String)>,
) -> axum::response::Response {
    let count = match errors::parse_count(&raw_count) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match store.process_order(&item_id, count) {
        Ok(allocation) => {
            let body = dto::order_to_json(&allocation);
            (StatusCode::OK, Json(ResponseEnvelope::new(body))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
