//! Current user route.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;
use crate::middleware::CurrentUser;

/// Creates the current-user routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// GET /me - The authenticated user's profile and personal cash balance.
async fn get_me(user: CurrentUser) -> impl IntoResponse {
    Json(json!({
        "id": user.0.id,
        "username": user.0.username,
        "display_name": user.0.display_name(),
        "role": user.0.role,
        "cash_balance": user.0.cash_balance,
    }))
}
