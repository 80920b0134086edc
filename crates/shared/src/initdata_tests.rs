use hmac::{Hmac, Mac};
use rstest::rstest;
use sha2::Sha256;

use crate::initdata::{InitDataError, verify};

const BOT_TOKEN: &str = "12345:test-token";
const NOW: i64 = 1_700_000_000;
const TTL: i64 = 86_400;

/// Builds a signed init-data string the way Telegram does.
fn signed_init_data(pairs: &[(&str, &str)], bot_token: &str) -> String {
    let mut sorted = pairs.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let data_check = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let secret = Hmac::<Sha256>::new_from_slice(b"WebAppData")
        .unwrap()
        .chain_update(bot_token.as_bytes())
        .finalize()
        .into_bytes();
    let mac = Hmac::<Sha256>::new_from_slice(secret.as_slice())
        .unwrap()
        .chain_update(data_check.as_bytes())
        .finalize()
        .into_bytes();

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k, v);
    }
    serializer.append_pair("hash", &hex::encode(mac));
    serializer.finish()
}

fn auth_date() -> String {
    NOW.to_string()
}

#[test]
fn test_valid_init_data_is_accepted() {
    let date = auth_date();
    let init_data = signed_init_data(
        &[
            ("user", r#"{"id":99,"username":"alice","first_name":"Alice"}"#),
            ("auth_date", &date),
            ("query_id", "AAE1"),
        ],
        BOT_TOKEN,
    );

    let user = verify(&init_data, BOT_TOKEN, NOW, TTL).unwrap();
    assert_eq!(user.id, 99);
    assert_eq!(user.username.as_deref(), Some("alice"));
}

#[test]
fn test_wrong_bot_token_is_rejected() {
    let date = auth_date();
    let init_data = signed_init_data(
        &[("user", r#"{"id":99}"#), ("auth_date", &date)],
        "other:token",
    );

    assert!(matches!(
        verify(&init_data, BOT_TOKEN, NOW, TTL),
        Err(InitDataError::BadSignature)
    ));
}

#[test]
fn test_tampered_payload_is_rejected() {
    let date = auth_date();
    let init_data = signed_init_data(
        &[("user", r#"{"id":99}"#), ("auth_date", &date)],
        BOT_TOKEN,
    );
    let tampered = init_data.replace("99", "11");

    assert!(matches!(
        verify(&tampered, BOT_TOKEN, NOW, TTL),
        Err(InitDataError::BadSignature)
    ));
}

#[test]
fn test_stale_auth_date_is_rejected() {
    let stale = (NOW - TTL - 1).to_string();
    let init_data = signed_init_data(
        &[("user", r#"{"id":99}"#), ("auth_date", &stale)],
        BOT_TOKEN,
    );

    assert!(matches!(
        verify(&init_data, BOT_TOKEN, NOW, TTL),
        Err(InitDataError::Stale)
    ));
}

#[test]
fn test_missing_user_field() {
    let date = auth_date();
    let init_data = signed_init_data(&[("auth_date", &date)], BOT_TOKEN);

    assert!(matches!(
        verify(&init_data, BOT_TOKEN, NOW, TTL),
        Err(InitDataError::MalformedUser(_))
    ));
}

#[test]
fn test_malformed_user_json() {
    let date = auth_date();
    let init_data = signed_init_data(&[("user", "not json"), ("auth_date", &date)], BOT_TOKEN);

    assert!(matches!(
        verify(&init_data, BOT_TOKEN, NOW, TTL),
        Err(InitDataError::MalformedUser(_))
    ));
}

#[rstest]
#[case("")]
#[case("   ")]
fn test_empty_init_data(#[case] raw: &str) {
    assert!(matches!(
        verify(raw, BOT_TOKEN, NOW, TTL),
        Err(InitDataError::Empty)
    ));
}

#[test]
fn test_missing_hash_field() {
    let init_data = "user=%7B%22id%22%3A99%7D&auth_date=1700000000";
    assert!(matches!(
        verify(init_data, BOT_TOKEN, NOW, TTL),
        Err(InitDataError::MissingHash)
    ));
}
