use super::*;
use crate::error::ErrorKind;
use crate::web::MockHttpClient;
use prolearn_shared::protocol::HttpMethod;
use serde_json::json;

const ROOT: &str = "http://api.test";

fn setup() -> (MockHttpClient, StorefrontApi<MockHttpClient>) {
    let client = MockHttpClient::new();
    let api = StorefrontApi::new(client.clone(), AppConfig::new(ROOT));
    (client, api)
}

fn course(uuid: &str) -> serde_json::Value {
    json!({
        "course_uuid": uuid,
        "title": format!("Course {}", uuid),
        "student_no": 3,
        "author": { "first_name": "Ada", "last_name": "Lovelace" },
        "price": "10.00",
        "image_url": "https://img/x.png"
    })
}

#[tokio::test]
async fn homepage_parses_sectors() {
    let (client, api) = setup();
    client.mock_response(
        HttpMethod::Get,
        "http://api.test/courses/",
        200,
        json!([{
            "sector_title": "Programming",
            "sector_uuid": "sec-1",
            "sector_image": "",
            "featured_course": [course("c1"), course("c2")]
        }]),
    );

    let sectors = api.homepage().await.unwrap();
    assert_eq!(sectors.len(), 1);
    assert_eq!(sectors[0].featured_course.len(), 2);

    let reqs = client.requests();
    assert_eq!(reqs.len(), 1);
    assert!(reqs[0].body.is_none());
    assert!(reqs[0].header_value(HEADER_AUTHORIZATION).is_none());
}

#[tokio::test]
async fn empty_cart_resolves_without_request() {
    let (client, api) = setup();
    let resp = api.cart_details(&[]).await.unwrap();
    assert!(resp.is_empty());
    assert_eq!(resp.cart_total, "0.00");
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn cart_details_posts_ids() {
    let (client, api) = setup();
    client.mock_response(
        HttpMethod::Post,
        "http://api.test/courses/cart/",
        200,
        json!({
            "cart_detail": [{
                "title": "Course c1",
                "price": "10.00",
                "image_url": "",
                "author": { "first_name": "Ada", "last_name": "Lovelace" }
            }],
            "cart_total": "10.00"
        }),
    );

    let resp = api.cart_details(&["c1".to_string()]).await.unwrap();
    assert_eq!(resp.cart_total, "10.00");

    let req = &client.requests()[0];
    assert_eq!(req.body.as_deref(), Some(r#"{"cart":["c1"]}"#));
    assert_eq!(req.header_value("content-type"), Some("application/json"));
}

#[tokio::test]
async fn authenticated_calls_carry_token_header() {
    let (client, api) = setup();
    client.mock_response(
        HttpMethod::Get,
        "http://api.test/users/profile/",
        200,
        json!({ "username": "alice", "email": "a@example.com" }),
    );

    let profile = api.profile("tok-1").await.unwrap();
    assert_eq!(profile.username.as_deref(), Some("alice"));
    assert_eq!(
        client.requests()[0].header_value(HEADER_AUTHORIZATION),
        Some("Token tok-1")
    );
}

#[tokio::test]
async fn protected_request_without_token_never_hits_network() {
    let (client, api) = setup();
    let err = api.send(&ProfileRequest, None).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn status_failures_are_classified() {
    let (client, api) = setup();
    client.mock_raw(
        HttpMethod::Post,
        "http://api.test/users/login/",
        401,
        r#"{"detail":"Invalid credentials"}"#,
    );

    let err = api.login("a@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.status_code(), Some(401));

    // 未 mock 的 URL 返回 404
    let err = api.course_detail("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status);
}

#[tokio::test]
async fn transport_and_decode_failures() {
    let (client, api) = setup();
    client.mock_offline("http://api.test/courses/");
    let err = api.homepage().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);

    client.mock_raw(
        HttpMethod::Get,
        "http://api.test/courses/search/rust/",
        200,
        "<html>oops</html>",
    );
    let err = api.search_courses("rust").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn blank_inputs_are_rejected_locally() {
    let (client, api) = setup();
    let err = api.search_courses("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = api.add_comment("c1", "  ", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn comment_accepts_empty_success_body() {
    let (client, api) = setup();
    client.mock_raw(HttpMethod::Post, "http://api.test/courses/comment/c1/", 201, "");

    api.add_comment("c1", " Nice course ", None).await.unwrap();
    let req = &client.requests()[0];
    assert_eq!(req.body.as_deref(), Some(r#"{"message":"Nice course"}"#));
}

#[tokio::test]
async fn sector_listing_and_auth_status() {
    let (client, api) = setup();
    client.mock_response(
        HttpMethod::Get,
        "http://api.test/courses/sec-9/",
        200,
        json!({ "data": [course("c1")], "sector_name": "Design", "total_students": 3 }),
    );
    client.mock_response(
        HttpMethod::Get,
        "http://api.test/users/auth-status/",
        200,
        json!({ "is_authenticated": true }),
    );

    let listing = api.sector_courses("sec-9").await.unwrap();
    assert_eq!(listing.sector_name.as_deref(), Some("Design"));
    assert!(api.auth_status("tok").await.unwrap());
}
