//! Period reports: income, expense, balances, and open debts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use kassa_core::ops::OpType;
use kassa_core::report::{Period, summarize};
use kassa_db::{DebtRepository, TransactionRepository, UnitRepository};

use crate::{AppState, response};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/report/{period}", get(get_report))
}

/// GET `/report/{period}` - Financial summary for today / week / month / all.
async fn get_report(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> impl IntoResponse {
    let Some(period) = Period::parse(&period) else {
        return response::detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            &format!("Неизвестный период: {period}"),
        );
    };

    let since = period.start(Utc::now());
    let transactions = match TransactionRepository::new((*state.db).clone())
        .list_since(since)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Database error listing transactions");
            return response::internal_error();
        }
    };

    // Audit entries and other non-catalog rows fall out of the fold here.
    let totals = summarize(
        transactions
            .iter()
            .filter_map(|tx| OpType::parse(&tx.tx_type).map(|op| (op, tx.amount))),
    );

    let units = match UnitRepository::new((*state.db).clone()).list_all().await {
        Ok(units) => units,
        Err(e) => {
            error!(error = %e, "Database error listing units");
            return response::internal_error();
        }
    };
    let debts = match DebtRepository::new((*state.db).clone()).list_open().await {
        Ok(debts) => debts,
        Err(e) => {
            error!(error = %e, "Database error listing debts");
            return response::internal_error();
        }
    };

    let unit_names: std::collections::HashMap<i32, &str> =
        units.iter().map(|u| (u.id, u.name.as_str())).collect();
    let total_debt: i64 = debts.iter().map(|d| d.amount).sum();

    Json(json!({
        "period": period.as_str(),
        "income": totals.income,
        "expense": totals.expense,
        "ips": units.iter().map(|u| json!({
            "id": u.id,
            "name": u.name,
            "bank_balance": u.bank_balance,
            "cash_balance": u.cash_balance,
            "debit_balance": u.debit_balance,
        })).collect::<Vec<_>>(),
        "ip_debts": debts.iter().map(|d| json!({
            "id": d.id,
            "debtor_ip_name": unit_names.get(&d.debtor_unit_id),
            "creditor_ip_name": unit_names.get(&d.creditor_unit_id),
            "amount": d.amount,
        })).collect::<Vec<_>>(),
        "total_debt": total_debt,
    }))
    .into_response()
}
