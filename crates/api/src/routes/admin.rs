//! Administrative routes: users and business units.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use kassa_db::entities::users::{ROLE_ADMIN, ROLE_USER};
use kassa_db::repositories::{UnitError, UserError};
use kassa_db::{UnitRepository, UserRepository};

use crate::middleware::AdminUser;
use crate::{AppState, response};

/// Creates the admin routes (nested under `/admin`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{user_id}/role", patch(set_role))
        .route("/ips", get(list_units))
        .route("/ips", post(create_unit))
        .route("/ips/{unit_id}/balances", patch(adjust_balances))
}

/// GET /admin/users - All registered users.
async fn list_users(State(state): State<AppState>, _admin: AdminUser) -> impl IntoResponse {
    match UserRepository::new((*state.db).clone()).list_all().await {
        Ok(users) => Json(
            users
                .iter()
                .map(|u| {
                    json!({
                        "id": u.id,
                        "username": u.username,
                        "display_name": u.display_name(),
                        "role": u.role,
                        "cash_balance": u.cash_balance,
                        "created_at": u.created_at,
                    })
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => {
            error!(error = %e, "Database error listing users");
            response::internal_error()
        }
    }
}

/// PATCH /admin/users/{user_id}/role request body.
#[derive(Debug, Deserialize)]
struct RoleBody {
    role: String,
}

/// PATCH `/admin/users/{user_id}/role` - Change a user's role.
async fn set_role(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<i64>,
    Json(body): Json<RoleBody>,
) -> impl IntoResponse {
    if body.role != ROLE_ADMIN && body.role != ROLE_USER {
        return response::detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Роль должна быть 'admin' или 'user'",
        );
    }
    if user_id == admin.id() && body.role == ROLE_USER {
        return response::detail(
            StatusCode::BAD_REQUEST,
            "Нельзя снять права с самого себя",
        );
    }

    match UserRepository::new((*state.db).clone())
        .set_role(user_id, &body.role)
        .await
    {
        Ok(user) => {
            info!(user_id, role = %user.role, admin = admin.id(), "Role changed");
            Json(json!({ "id": user.id, "role": user.role })).into_response()
        }
        Err(UserError::NotFound(_)) => {
            response::detail(StatusCode::NOT_FOUND, &format!("Пользователь {user_id} не найден"))
        }
        Err(UserError::Database(e)) => {
            error!(error = %e, "Database error setting role");
            response::internal_error()
        }
    }
}

/// GET /admin/ips - All units with capital figures.
async fn list_units(State(state): State<AppState>, _admin: AdminUser) -> impl IntoResponse {
    match UnitRepository::new((*state.db).clone()).list_all().await {
        Ok(units) => Json(
            units
                .iter()
                .map(|u| {
                    json!({
                        "id": u.id,
                        "name": u.name,
                        "bank_balance": u.bank_balance,
                        "cash_balance": u.cash_balance,
                        "debit_balance": u.debit_balance,
                        "initial_capital": u.initial_capital,
                    })
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => {
            error!(error = %e, "Database error listing units");
            response::internal_error()
        }
    }
}

/// POST /admin/ips request body.
///
/// Either `initial_capital` (landing on the bank balance) or explicit
/// starting balances.
#[derive(Debug, Deserialize)]
struct CreateUnitBody {
    name: String,
    initial_capital: Option<i64>,
    bank_balance: Option<i64>,
    cash_balance: Option<i64>,
}

/// Resolves the starting (bank, cash) pair from the request body.
fn starting_balances(body: &CreateUnitBody) -> (i64, i64) {
    if body.bank_balance.is_some() || body.cash_balance.is_some() {
        (
            body.bank_balance.unwrap_or(0),
            body.cash_balance.unwrap_or(0),
        )
    } else {
        (body.initial_capital.unwrap_or(0), 0)
    }
}

/// POST /admin/ips - Create a business unit.
async fn create_unit(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(body): Json<CreateUnitBody>,
) -> impl IntoResponse {
    let name = body.name.trim();
    if name.is_empty() {
        return response::detail(StatusCode::UNPROCESSABLE_ENTITY, "Название ИП не задано");
    }

    let (bank_balance, cash_balance) = starting_balances(&body);
    match UnitRepository::new((*state.db).clone())
        .create(name, bank_balance, cash_balance)
        .await
    {
        Ok(unit) => {
            info!(unit_id = unit.id, name = %unit.name, admin = admin.id(), "Unit created");
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": unit.id,
                    "name": unit.name,
                    "bank_balance": unit.bank_balance,
                    "cash_balance": unit.cash_balance,
                })),
            )
                .into_response()
        }
        Err(err) => unit_error(&err),
    }
}

/// PATCH /admin/ips/{unit_id}/balances request body.
#[derive(Debug, Deserialize)]
struct AdjustBody {
    bank_balance: i64,
    cash_balance: i64,
}

/// PATCH `/admin/ips/{unit_id}/balances` - Direct balance correction.
async fn adjust_balances(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(unit_id): Path<i32>,
    Json(body): Json<AdjustBody>,
) -> impl IntoResponse {
    match UnitRepository::new((*state.db).clone())
        .adjust_balances(unit_id, body.bank_balance, body.cash_balance, admin.id())
        .await
    {
        Ok(unit) => Json(json!({
            "id": unit.id,
            "name": unit.name,
            "bank_balance": unit.bank_balance,
            "cash_balance": unit.cash_balance,
        }))
        .into_response(),
        Err(err) => unit_error(&err),
    }
}

/// Maps a unit repository error onto its HTTP response.
fn unit_error(err: &UnitError) -> axum::response::Response {
    match err {
        UnitError::Database(e) => {
            error!(error = %e, "Database error in unit operation");
            response::internal_error()
        }
        _ => {
            let status = StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            response::detail(status, &err.to_string())
        }
    }
}
