//! Telegram Mini App init-data verification.
//!
//! Every request may carry the raw `initData` string handed to the Mini App
//! by Telegram. Its authenticity is checked with the documented HMAC-SHA256
//! scheme: the bot token keyed with `"WebAppData"` yields the secret key,
//! which signs the sorted, decoded `key=value` pairs (minus `hash`).
//!
//! <https://core.telegram.org/bots/webapps#validating-data-received-via-the-mini-app>

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors produced while verifying init data.
#[derive(Debug, Error)]
pub enum InitDataError {
    /// The init-data string is empty.
    #[error("init data is empty")]
    Empty,

    /// No `hash` field present.
    #[error("init data is missing the hash field")]
    MissingHash,

    /// The HMAC signature does not match.
    #[error("init data signature mismatch")]
    BadSignature,

    /// `auth_date` is older than the configured TTL.
    #[error("init data is stale")]
    Stale,

    /// The embedded `user` JSON is missing or malformed.
    #[error("init data user payload is malformed: {0}")]
    MalformedUser(String),
}

/// The user object embedded in verified init data.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    /// Telegram user id.
    pub id: i64,
    /// Telegram username, if the user has one.
    pub username: Option<String>,
    /// First name as shown in Telegram.
    pub first_name: Option<String>,
}

/// Verifies an init-data blob and returns the embedded user.
///
/// `now_unix` is the verifier's clock; data older than `max_age_secs` is
/// rejected. Verification never touches the database - resolving the user
/// to an account is the api layer's job.
///
/// # Errors
///
/// Returns an `InitDataError` describing the first failed check.
pub fn verify(
    init_data: &str,
    bot_token: &str,
    now_unix: i64,
    max_age_secs: i64,
) -> Result<TelegramUser, InitDataError> {
    if init_data.trim().is_empty() {
        return Err(InitDataError::Empty);
    }

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(init_data.as_bytes())
        .into_owned()
        .collect();

    let hash_pos = pairs
        .iter()
        .position(|(key, _)| key == "hash")
        .ok_or(InitDataError::MissingHash)?;
    let (_, received_hash) = pairs.remove(hash_pos);

    // Data-check string: sorted key=value pairs joined by newlines.
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    let data_check = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");

    let secret_key = HmacSha256::new_from_slice(b"WebAppData")
        .expect("HMAC accepts any key length")
        .chain_update(bot_token.as_bytes())
        .finalize()
        .into_bytes();

    let mac = HmacSha256::new_from_slice(secret_key.as_slice())
        .expect("HMAC accepts any key length")
        .chain_update(data_check.as_bytes());

    let received = hex::decode(&received_hash).map_err(|_| InitDataError::BadSignature)?;
    mac.verify_slice(&received)
        .map_err(|_| InitDataError::BadSignature)?;

    let auth_date: i64 = pairs
        .iter()
        .find(|(key, _)| key == "auth_date")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0);
    if now_unix - auth_date > max_age_secs {
        return Err(InitDataError::Stale);
    }

    let user_raw = pairs
        .iter()
        .find(|(key, _)| key == "user")
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| InitDataError::MalformedUser("missing user field".to_string()))?;

    serde_json::from_str(user_raw).map_err(|e| InitDataError::MalformedUser(e.to_string()))
}
