//! Identity middleware: init-data verification and user resolution.
//!
//! Identity issuance is external - Telegram signs the init data, this
//! service only verifies it. A request without the header is served as a
//! guest with read-only access; a request with a bad or stale header is
//! rejected outright. Verified users are auto-registered on first
//! contact, with `admin_ids` promotion.

use axum::Json;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{StatusCode, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use serde_json::json;
use tracing::error;

use kassa_db::UserRepository;
use kassa_db::entities::users;
use kassa_shared::initdata;

use crate::AppState;
use crate::response;

/// The header carrying the raw Telegram init data.
pub const INIT_DATA_HEADER: &str = "x-init-data";

/// The resolved identity of a request.
#[derive(Debug, Clone)]
pub enum Identity {
    /// No credential presented; read-only access.
    Guest,
    /// A verified, registered user.
    User(users::Model),
}

/// Resolves the request's identity and stores it in request extensions.
///
/// 1. No `X-Init-Data` header: the request proceeds as a guest.
/// 2. A verifiable header: the embedded user is loaded (registering it on
///    first contact) and attached.
/// 3. A bad or stale header: 401 with the verification failure.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let raw = request
        .headers()
        .get(INIT_DATA_HEADER)
        .and_then(|value| value.to_str().ok());

    let identity = match raw {
        None => Identity::Guest,
        Some(raw) => {
            let telegram = &state.config.telegram;
            match initdata::verify(
                raw,
                &telegram.bot_token,
                Utc::now().timestamp(),
                telegram.auth_ttl_secs,
            ) {
                Ok(tg_user) => {
                    let repo = UserRepository::new((*state.db).clone());
                    match repo
                        .get_or_create(
                            tg_user.id,
                            tg_user.username.as_deref(),
                            &telegram.admin_ids_list(),
                        )
                        .await
                    {
                        Ok(user) => Identity::User(user),
                        Err(e) => {
                            error!(error = %e, user_id = tg_user.id, "Failed to resolve user");
                            return response::internal_error();
                        }
                    }
                }
                Err(e) => {
                    return response::detail(StatusCode::UNAUTHORIZED, &e.to_string());
                }
            }
        }
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

fn unauthorized() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Требуется авторизация" })),
    )
}

/// Extractor for an authenticated (non-guest) user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub users::Model);

impl CurrentUser {
    /// Returns the user's Telegram id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(Identity::User(user)) => Ok(Self(user.clone())),
            Some(Identity::Guest) | None => Err(unauthorized()),
        }
    }
}

/// Extractor for an authenticated admin user.
#[derive(Debug, Clone)]
pub struct AdminUser(pub users::Model);

impl AdminUser {
    /// Returns the admin's Telegram id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(Identity::User(user)) if user.is_admin() => Ok(Self(user.clone())),
            Some(Identity::User(_)) => Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "detail": "Требуются права администратора" })),
            )),
            Some(Identity::Guest) | None => Err(unauthorized()),
        }
    }
}
