use std::collections::HashMap;

use axum::Router;
use axum::extract::{Json, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};

use super::*;
use crate::state::test_helpers::{spawn_http_stub, temp_session_path};

const ANON_KEY: &str = "anon-test-key";

fn user_json(email: &str, confirmed: bool) -> Value {
    json!({
        "id": "u1",
        "email": email,
        "user_metadata": { "name": "Ana" },
        "email_confirmed_at": if confirmed { json!("2025-01-01T00:00:00Z") } else { Value::Null },
    })
}

fn token_json(access: &str, email: &str) -> Value {
    json!({
        "access_token": access,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "rt-1",
        "user": user_json(email, true),
    })
}

fn has_api_key(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(ANON_KEY)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

async fn token(headers: HeaderMap, Query(q): Query<HashMap<String, String>>, Json(body): Json<Value>) -> Response {
    if !has_api_key(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No API key found in request" }))).into_response();
    }
    match q.get("grant_type").map(String::as_str) {
        Some("password") => {
            if body["email"] == "user@example.com" && body["password"] == "secret" {
                Json(token_json("at-1", "user@example.com")).into_response()
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
                )
                    .into_response()
            }
        }
        Some("refresh_token") if body["refresh_token"] == "rt-1" => {
            Json(token_json("at-2", "user@example.com")).into_response()
        }
        _ => (StatusCode::BAD_REQUEST, Json(json!({ "msg": "Invalid Refresh Token" }))).into_response(),
    }
}

async fn signup(Json(body): Json<Value>) -> Response {
    match body["email"].as_str() {
        Some("new@example.com") => Json(user_json("new@example.com", false)).into_response(),
        Some("smtp@example.com") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "code": 500, "error_code": "unexpected_failure", "msg": "Error sending confirmation email" })),
        )
            .into_response(),
        Some(email) => Json(token_json("at-1", email)).into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn user(headers: HeaderMap) -> Response {
    match bearer(&headers).as_deref() {
        Some("at-1" | "at-2") => Json(user_json("user@example.com", true)).into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "invalid JWT" }))).into_response(),
    }
}

async fn logout(headers: HeaderMap) -> StatusCode {
    if bearer(&headers).is_some() { StatusCode::NO_CONTENT } else { StatusCode::UNAUTHORIZED }
}

async fn gotrue_stub() -> String {
    let router = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/user", get(user))
        .route("/auth/v1/logout", post(logout));
    spawn_http_stub(router).await
}

async fn client(name: &str) -> (SupabaseAuth, SessionFile) {
    let url = gotrue_stub().await;
    let storage = SessionFile::new(temp_session_path(name));
    let config = AuthBackendConfig { url, anon_key: ANON_KEY.into() };
    let auth = SupabaseAuth::new(Some(config), storage.clone(), 5).unwrap();
    (auth, storage)
}

// =============================================================================
// SIGN IN / SIGN UP
// =============================================================================

#[tokio::test]
async fn sign_in_success_returns_user_and_persists_tokens() {
    let (auth, storage) = client("gotrue_sign_in").await;
    let user = auth.sign_in("user@example.com", "secret").await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.email, "user@example.com");
    assert_eq!(user.display_name(), "Ana");

    let stored = storage.load().await.unwrap().unwrap();
    assert_eq!(stored.access_token, "at-1");
    assert_eq!(stored.refresh_token.as_deref(), Some("rt-1"));
    assert!(stored.expires_at.is_some());
    assert_eq!(auth.access_token().await.as_deref(), Some("at-1"));
    storage.clear().await.unwrap();
}

#[tokio::test]
async fn sign_in_failure_surfaces_backend_message() {
    let (auth, storage) = client("gotrue_sign_in_bad").await;
    let err = auth.sign_in("user@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.message, "Invalid login credentials");
    assert!(storage.load().await.unwrap().is_none());
}

#[tokio::test]
async fn sign_up_without_confirmation_returns_session_user() {
    let (auth, storage) = client("gotrue_sign_up").await;
    let user = auth.sign_up("fresh@example.com", "pw").await.unwrap();
    assert_eq!(user.email, "fresh@example.com");
    assert!(user.email_confirmed);
    assert!(storage.load().await.unwrap().is_some());
    storage.clear().await.unwrap();
}

#[tokio::test]
async fn sign_up_pending_confirmation_returns_unconfirmed_user() {
    let (auth, storage) = client("gotrue_sign_up_unconfirmed").await;
    let user = auth.sign_up("new@example.com", "pw").await.unwrap();
    assert_eq!(user.email, "new@example.com");
    assert!(!user.email_confirmed);
    assert!(storage.load().await.unwrap().is_none());
}

#[tokio::test]
async fn sign_up_smtp_failure_keeps_provider_message() {
    let (auth, _storage) = client("gotrue_sign_up_smtp").await;
    let err = auth.sign_up("smtp@example.com", "pw").await.unwrap_err();
    assert_eq!(err.message, "Error sending confirmation email");
}

// =============================================================================
// CURRENT USER / SIGN OUT
// =============================================================================

#[tokio::test]
async fn current_user_without_session_is_none() {
    let (auth, _storage) = client("gotrue_no_session").await;
    assert_eq!(auth.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn current_user_with_valid_session() {
    let (auth, storage) = client("gotrue_valid_session").await;
    auth.sign_in("user@example.com", "secret").await.unwrap();
    let user = auth.current_user().await.unwrap().unwrap();
    assert_eq!(user.email, "user@example.com");
    storage.clear().await.unwrap();
}

#[tokio::test]
async fn current_user_refreshes_expired_token() {
    let (auth, storage) = client("gotrue_expired").await;
    storage
        .save(&StoredSession {
            access_token: "old".into(),
            refresh_token: Some("rt-1".into()),
            expires_at: Some(1),
            user: AuthUser::new("u1", "user@example.com"),
        })
        .await
        .unwrap();

    let user = auth.current_user().await.unwrap();
    assert!(user.is_some());
    assert_eq!(storage.load().await.unwrap().unwrap().access_token, "at-2");
    storage.clear().await.unwrap();
}

#[tokio::test]
async fn current_user_retries_once_after_rejected_token() {
    let (auth, storage) = client("gotrue_rejected_refresh").await;
    storage
        .save(&StoredSession {
            access_token: "stale".into(),
            refresh_token: Some("rt-1".into()),
            expires_at: None,
            user: AuthUser::new("u1", "user@example.com"),
        })
        .await
        .unwrap();

    assert!(auth.current_user().await.unwrap().is_some());
    storage.clear().await.unwrap();
}

#[tokio::test]
async fn current_user_rejected_without_refresh_clears_session() {
    let (auth, storage) = client("gotrue_rejected").await;
    storage
        .save(&StoredSession {
            access_token: "stale".into(),
            refresh_token: None,
            expires_at: None,
            user: AuthUser::new("u1", "user@example.com"),
        })
        .await
        .unwrap();

    assert_eq!(auth.current_user().await.unwrap(), None);
    assert!(storage.load().await.unwrap().is_none());
}

#[tokio::test]
async fn sign_out_clears_stored_session() {
    let (auth, storage) = client("gotrue_sign_out").await;
    auth.sign_in("user@example.com", "secret").await.unwrap();
    auth.sign_out().await.unwrap();
    assert!(storage.load().await.unwrap().is_none());
    assert_eq!(auth.access_token().await, None);
}

#[tokio::test]
async fn sign_out_without_session_succeeds() {
    let (auth, _storage) = client("gotrue_sign_out_none").await;
    auth.sign_out().await.unwrap();
}

// =============================================================================
// NOT CONFIGURED
// =============================================================================

#[tokio::test]
async fn unconfigured_client_fails_without_panicking() {
    let storage = SessionFile::new(temp_session_path("gotrue_unconfigured"));
    let auth = SupabaseAuth::new(None, storage, 5).unwrap();
    let err = auth.sign_in("a@b.c", "pw").await.unwrap_err();
    assert!(err.message.contains("not configured"));
    assert!(auth.sign_up("a@b.c", "pw").await.is_err());
    assert!(auth.current_user().await.is_err());
    assert!(auth.sign_out().await.is_err());
}

// =============================================================================
// PARSING
// =============================================================================

#[test]
fn parse_token_response_computes_expiry_from_expires_in() {
    let body = token_json("at-9", "a@b.c").to_string();
    let session = parse_token_response(&body, 1_000).unwrap();
    assert_eq!(session.access_token, "at-9");
    assert_eq!(session.expires_at, Some(4_600));
}

#[test]
fn parse_token_response_saturates_huge_expires_in() {
    let mut body = token_json("at-9", "a@b.c");
    body["expires_in"] = json!(u64::MAX);
    let session = parse_token_response(&body.to_string(), 1_700_000_000).unwrap();
    assert_eq!(session.expires_at, Some(u64::MAX));
    assert!(!session.is_expired(1_700_000_001));
}

#[test]
fn parse_token_response_prefers_explicit_expires_at() {
    let mut body = token_json("at-9", "a@b.c");
    body["expires_at"] = json!(42);
    let session = parse_token_response(&body.to_string(), 1_000).unwrap();
    assert_eq!(session.expires_at, Some(42));
}

#[test]
fn parse_signup_nested_user_without_tokens() {
    let body = json!({ "user": user_json("n@b.c", false), "session": null }).to_string();
    match parse_signup_response(&body, 0).unwrap() {
        SignUpOutcome::Unconfirmed(user) => assert_eq!(user.email, "n@b.c"),
        SignUpOutcome::Session(_) => panic!("expected unconfirmed user"),
    }
}

#[test]
fn parse_user_rejects_garbage() {
    let err = parse_user("<html>").unwrap_err();
    assert!(err.message.starts_with("unexpected auth response"));
}

#[test]
fn error_message_prefers_known_fields() {
    assert_eq!(error_message(400, r#"{"msg":"a"}"#), "a");
    assert_eq!(error_message(400, r#"{"error":"x","error_description":"b"}"#), "b");
    assert_eq!(error_message(422, r#"{"message":"c"}"#), "c");
    assert_eq!(error_message(400, r#"{"error":"d"}"#), "d");
}

#[test]
fn error_message_falls_back_to_status_and_body() {
    assert_eq!(error_message(502, "bad gateway"), "502: bad gateway");
    assert_eq!(error_message(500, ""), "auth request failed with status 500");
    assert_eq!(error_message(400, r#"{"msg":""}"#), r#"400: {"msg":""}"#);
}
