//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::identity::identity_middleware};

pub mod admin;
pub mod balance;
pub mod debts;
pub mod health;
pub mod me;
pub mod operations;
pub mod reports;

/// Creates the API router with all routes.
///
/// Everything except the health check runs behind the identity
/// middleware; read-only routes still serve guests, while the
/// `CurrentUser`/`AdminUser` extractors guard writes and admin CRUD.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let identified = Router::new()
        .merge(me::routes())
        .merge(balance::routes())
        .merge(operations::routes())
        .merge(debts::routes())
        .merge(reports::routes())
        .nest("/admin", admin::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    Router::new().merge(health::routes()).merge(identified)
}
