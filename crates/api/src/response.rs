//! Error response helpers.
//!
//! Every failure leaves the service as `{"detail": <message>}` with a 4xx
//! or 5xx status, matching the contract the Mini App client expects.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use kassa_core::ops::OpError;

/// Builds a `{"detail": ...}` response with the given status.
pub fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Maps a ledger operation error onto its HTTP response.
///
/// Infrastructure failures are logged and masked; domain failures carry
/// their message through.
pub fn op_error(err: &OpError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, code = err.error_code(), "Operation failed");
        return internal_error();
    }
    detail(status, &err.to_string())
}

/// The masked 500 response.
pub fn internal_error() -> Response {
    detail(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Внутренняя ошибка сервера",
    )
}
