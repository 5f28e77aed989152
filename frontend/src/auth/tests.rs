use super::*;
use crate::error::ErrorKind;
use crate::web::{MemoryStorage, MockHttpClient};
use prolearn_shared::STORAGE_TOKEN_KEY;
use prolearn_shared::protocol::HttpMethod;
use serde_json::json;

const LOGIN: &str = "http://api.test/users/login/";
const SIGNUP: &str = "http://api.test/users/signup/";
const PROFILE: &str = "http://api.test/users/profile/";
const LOGOUT: &str = "http://api.test/users/logout/";
const STATUS: &str = "http://api.test/users/auth-status/";

type TestSession = SessionService<MockHttpClient, MemoryStorage>;

fn setup() -> (MockHttpClient, MemoryStorage, TestSession) {
    let client = MockHttpClient::new();
    let store = MemoryStorage::new();
    let service = SessionService::new(
        StorefrontApi::new(client.clone(), AppConfig::new("http://api.test")),
        SessionStore::new(store.clone()),
    );
    (client, store, service)
}

fn alice() -> serde_json::Value {
    json!({ "id": 7, "username": "alice", "email": "alice@x.io", "name": "Alice Smith" })
}

#[tokio::test]
async fn login_persists_token_and_fetches_profile() {
    let (client, store, service) = setup();
    client.mock_response(HttpMethod::Post, LOGIN, 200, json!({ "token": "tok-1" }));
    client.mock_response(HttpMethod::Get, PROFILE, 200, alice());

    let state = service.login("alice@x.io", "pw").await;
    assert!(state.is_authenticated());
    assert_eq!(state.username().as_deref(), Some("alice"));
    assert_eq!(store.get(STORAGE_TOKEN_KEY).as_deref(), Some("tok-1"));

    let reqs = client.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[1].header_value("authorization"), Some("Token tok-1"));
}

#[tokio::test]
async fn login_ignores_embedded_user_and_refetches() {
    let (client, _, service) = setup();
    client.mock_response(
        HttpMethod::Post,
        LOGIN,
        200,
        json!({ "token": "tok-1", "user": { "username": "stale" } }),
    );
    client.mock_response(HttpMethod::Get, PROFILE, 200, alice());

    let state = service.login("alice@x.io", "pw").await;
    assert_eq!(state.username().as_deref(), Some("alice"));
}

#[tokio::test]
async fn login_without_token_fails() {
    let (client, store, service) = setup();
    client.mock_response(HttpMethod::Post, LOGIN, 200, json!({ "detail": "ok" }));

    let state = service.login("alice@x.io", "pw").await;
    assert_eq!(state, SessionState::Anonymous);
    assert!(store.get(STORAGE_TOKEN_KEY).is_none());
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn rejected_credentials_leave_no_token() {
    let (client, store, service) = setup();
    client.mock_response(
        HttpMethod::Post,
        LOGIN,
        401,
        json!({ "detail": "Invalid credentials" }),
    );

    assert!(!service.login("alice@x.io", "wrong").await.is_authenticated());
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn blank_login_fields_skip_the_network() {
    let (client, _, service) = setup();
    assert!(!service.login("  ", "pw").await.is_authenticated());
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn profile_failure_after_login_clears_token() {
    let (client, store, service) = setup();
    client.mock_response(HttpMethod::Post, LOGIN, 200, json!({ "token": "tok-1" }));
    client.mock_response(HttpMethod::Get, PROFILE, 500, json!({}));

    assert!(!service.login("alice@x.io", "pw").await.is_authenticated());
    assert!(store.get(STORAGE_TOKEN_KEY).is_none());
}

#[tokio::test]
async fn register_uses_signup_endpoint() {
    let (client, _, service) = setup();
    client.mock_response(HttpMethod::Post, SIGNUP, 201, json!({ "access": "tok-2" }));
    client.mock_response(HttpMethod::Get, PROFILE, 200, alice());

    let state = service.register("Alice", "alice@x.io", "pw").await;
    assert!(state.is_authenticated());

    let body: serde_json::Value =
        serde_json::from_str(client.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "alice@x.io");
}

#[tokio::test]
async fn restore_without_token_is_anonymous() {
    let (client, _, service) = setup();
    assert_eq!(service.restore().await, SessionState::Anonymous);
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn restore_with_valid_token() {
    let (client, store, service) = setup();
    store.set(STORAGE_TOKEN_KEY, "tok-1");
    client.mock_response(HttpMethod::Get, PROFILE, 200, alice());

    let state = service.restore().await;
    assert_eq!(state.profile().map(|p| p.display_name()).as_deref(), Some("Alice Smith"));
}

#[tokio::test]
async fn restore_clears_rejected_token() {
    let (client, store, service) = setup();
    store.set(STORAGE_TOKEN_KEY, "expired");
    client.mock_response(HttpMethod::Get, PROFILE, 401, json!({ "detail": "Invalid token." }));

    assert!(!service.restore().await.is_authenticated());
    assert!(store.get(STORAGE_TOKEN_KEY).is_none());
}

#[tokio::test]
async fn restore_keeps_token_when_offline() {
    let (client, store, service) = setup();
    store.set(STORAGE_TOKEN_KEY, "tok-1");
    client.mock_offline(PROFILE);

    assert!(!service.restore().await.is_authenticated());
    assert_eq!(store.get(STORAGE_TOKEN_KEY).as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn logout_clears_token_even_if_remote_fails() {
    let (client, store, service) = setup();
    store.set(STORAGE_TOKEN_KEY, "tok-1");
    client.mock_offline(LOGOUT);

    assert_eq!(service.logout().await, SessionState::Anonymous);
    assert!(store.get(STORAGE_TOKEN_KEY).is_none());
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn logout_without_token_makes_no_request() {
    let (client, _, service) = setup();
    service.logout().await;
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn check_status_reads_remote_flag() {
    let (client, store, service) = setup();
    assert!(!service.check_status().await);

    store.set(STORAGE_TOKEN_KEY, "tok-1");
    client.mock_response(HttpMethod::Get, STATUS, 200, json!({ "is_authenticated": true }));
    assert!(service.check_status().await);
}

#[test]
fn registration_validation() {
    let err = validate_registration("A", "a@x.io", "pw1", "pw2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.user_message(), "Passwords do not match");

    let err = validate_registration("", "a@x.io", "pw", "pw").unwrap_err();
    assert_eq!(err.user_message(), "Please fill in all fields");

    assert!(validate_registration("A", "a@x.io", "pw", "pw").is_ok());
}

#[test]
fn session_state_accessors() {
    let profile: Profile = serde_json::from_value(json!({ "email": "bob@x.io" })).unwrap();
    let state = SessionState::Authenticated(profile);
    assert!(state.is_authenticated());
    assert_eq!(state.username().as_deref(), Some("bob@x.io"));
    assert_eq!(SessionState::Anonymous.username(), None);
}
