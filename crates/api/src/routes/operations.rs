//! Operation submission and transaction history.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use kassa_core::ops::{OpError, OpType, OperationRequest, label_for};
use kassa_db::{OperationRepository, TransactionRepository, UnitRepository, UserRepository};

use crate::middleware::CurrentUser;
use crate::{AppState, response};

/// History page size when the client does not ask for one.
const DEFAULT_HISTORY_LIMIT: u64 = 50;
/// Hard cap on one history page.
const MAX_HISTORY_LIMIT: u64 = 200;

/// Creates the operation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/operations", post(create_operation))
        .route("/transactions", get(get_transactions))
}

/// POST /operations request body.
#[derive(Debug, Deserialize)]
struct OperationBody {
    op_type: String,
    amount: i64,
    ip_id: Option<i32>,
    target_ip_id: Option<i32>,
    comment: Option<String>,
}

/// POST /operations - Validate and apply one ledger operation.
async fn create_operation(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<OperationBody>,
) -> impl IntoResponse {
    let Some(op_type) = OpType::parse(&body.op_type) else {
        return response::op_error(&OpError::UnknownType(body.op_type));
    };

    let request = OperationRequest {
        op_type,
        amount: body.amount,
        unit_id: body.ip_id,
        target_unit_id: body.target_ip_id,
        comment: body.comment,
    };

    match OperationRepository::new((*state.db).clone())
        .submit(user.id(), request)
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

/// GET /transactions query parameters.
#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<u64>,
}

/// GET /transactions - The history feed, newest first.
async fn get_transactions(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);

    let transactions = match TransactionRepository::new((*state.db).clone())
        .list_recent(limit)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Database error listing transactions");
            return response::internal_error();
        }
    };

    let unit_names = match unit_name_map(&state).await {
        Ok(names) => names,
        Err(resp) => return resp,
    };
    let user_names: HashMap<i64, String> =
        match UserRepository::new((*state.db).clone()).list_all().await {
            Ok(users) => users.iter().map(|u| (u.id, u.display_name())).collect(),
            Err(e) => {
                error!(error = %e, "Database error listing users");
                return response::internal_error();
            }
        };

    let rows: Vec<_> = transactions
        .iter()
        .map(|tx| {
            json!({
                "id": tx.id,
                "type": tx.tx_type,
                "type_label": label_for(&tx.tx_type),
                "amount": tx.amount,
                "ip_name": tx.unit_id.and_then(|id| unit_names.get(&id)),
                "target_ip_name": tx.target_unit_id.and_then(|id| unit_names.get(&id)),
                "user_name": user_names.get(&tx.user_id),
                "comment": tx.comment,
                "created_at": tx.created_at,
            })
        })
        .collect();

    Json(rows).into_response()
}

/// Loads the unit id -> name map used to decorate history rows.
pub(crate) async fn unit_name_map(
    state: &AppState,
) -> Result<HashMap<i32, String>, axum::response::Response> {
    match UnitRepository::new((*state.db).clone()).list_all().await {
        Ok(units) => Ok(units.into_iter().map(|u| (u.id, u.name)).collect()),
        Err(e) => {
            error!(error = %e, "Database error listing units");
            Err(response::internal_error())
        }
    }
}
