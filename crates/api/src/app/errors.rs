use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use packforge_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::ItemNotFound(_) | DomainError::IndexedItemNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "item_not_found", err.to_string())
        }
        DomainError::PackNotFound { .. } => {
            json_error(StatusCode::NOT_FOUND, "pack_not_found", err.to_string())
        }
        DomainError::PackAlreadyExists { .. } => {
            json_error(StatusCode::CONFLICT, "pack_already_exists", err.to_string())
        }
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_count(raw: &str) -> Result<i64, axum::response::Response> {
    raw.trim().parse::<i64>().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_count",
            format!("count must be an integer, got {raw:?}"),
        )
    })
}
