//! Debt listing and repayment.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use kassa_db::{DebtRepository, OperationRepository};

use crate::middleware::CurrentUser;
use crate::routes::operations::unit_name_map;
use crate::{AppState, response};

/// Creates the debt routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/debts", get(list_debts))
        .route("/debts/{debt_id}/repay", post(repay_debt))
}

/// GET /debts - All open debts between units, with names.
async fn list_debts(State(state): State<AppState>) -> impl IntoResponse {
    let debts = match DebtRepository::new((*state.db).clone()).list_open().await {
        Ok(debts) => debts,
        Err(e) => {
            error!(error = %e, "Database error listing debts");
            return response::internal_error();
        }
    };

    let unit_names = match unit_name_map(&state).await {
        Ok(names) => names,
        Err(resp) => return resp,
    };

    let rows: Vec<_> = debts
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "creditor_ip_id": d.creditor_unit_id,
                "creditor_ip_name": unit_names.get(&d.creditor_unit_id),
                "debtor_ip_id": d.debtor_unit_id,
                "debtor_ip_name": unit_names.get(&d.debtor_unit_id),
                "amount": d.amount,
            })
        })
        .collect();

    Json(rows).into_response()
}

/// POST /debts/{debt_id}/repay request body.
#[derive(Debug, Deserialize)]
struct RepayBody {
    amount: i64,
}

/// POST `/debts/{debt_id}/repay` - Repay a debt, partially or fully.
async fn repay_debt(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(debt_id): Path<i32>,
    Json(body): Json<RepayBody>,
) -> impl IntoResponse {
    match OperationRepository::new((*state.db).clone())
        .repay(user.id(), debt_id, body.amount)
        .await
    {
        Ok(done) => Json(json!({
            "new_balance": done.new_balance,
            "transaction_id": done.transaction_id,
        }))
        .into_response(),
        Err(err) => response::op_error(&err),
    }
}
