//! Unit balances and aggregate totals.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use kassa_db::UnitRepository;

use crate::{AppState, response};

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/balance", get(get_balance))
}

/// GET /balance - Every unit's balances plus the aggregate totals.
async fn get_balance(State(state): State<AppState>) -> impl IntoResponse {
    let units = match UnitRepository::new((*state.db).clone()).list_all().await {
        Ok(units) => units,
        Err(e) => {
            error!(error = %e, "Database error listing units");
            return response::internal_error();
        }
    };

    let total_bank: i64 = units.iter().map(|u| u.bank_balance).sum();
    let total_cash: i64 = units.iter().map(|u| u.cash_balance).sum();
    let ips: Vec<_> = units
        .iter()
        .map(|u| {
            json!({
                "id": u.id,
                "name": u.name,
                "bank_balance": u.bank_balance,
                "cash_balance": u.cash_balance,
                "debit_balance": u.debit_balance,
            })
        })
        .collect();

    Json(json!({
        "total_bank": total_bank,
        "total_cash": total_cash,
        "ips": ips,
    }))
    .into_response()
}
