//! Router tests: gate, handlers and status mapping end to end

mod common;

use axum::body::Body;
use axum::http::{StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{body_bytes, body_json, request, router, with_peer};

const GENERATE: &str = "/api/v1/owt/GenerateOwtToken";
const VALIDATE: &str = "/api/v1/owt/InValidateToken";
const PAYLOAD: &str = "/api/v1/owt/GetPayloadFromToken";

fn claim_request() -> Value {
    json!({
        "issuer": "svcA",
        "audience": "appB",
        "role": "Admin",
        "actor": "batch-runner",
        "email": "ops@example.com"
    })
}

async fn issue_token(app: &axum::Router) -> String {
    let req = request("POST", GENERATE, "client-one")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(claim_request().to_string()))
        .unwrap();
    let res = app.clone().oneshot(with_peer(req)).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    match body_json(res).await {
        Value::String(token) => token,
        other => panic!("expected a token string, got {other}"),
    }
}

fn bearer_request(uri: &str, token: Option<&str>) -> axum::http::Request<Body> {
    let mut builder = request("POST", uri, "client-one");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    with_peer(builder.body(Body::empty()).unwrap())
}

#[tokio::test]
async fn test_generate_then_validate() {
    let app = router("client-one", "");
    let token = issue_token(&app).await;
    assert_eq!(token.split('.').count(), 3);

    let res = app
        .clone()
        .oneshot(bearer_request(VALIDATE, Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(res).await, json!("True"));
}

#[tokio::test]
async fn test_validate_garbage_and_absent_tokens() {
    let app = router("client-one", "");

    let res = app
        .clone()
        .oneshot(bearer_request(VALIDATE, Some("not.a.token")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(res).await, json!("False"));

    let res = app.oneshot(bearer_request(VALIDATE, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(res).await, json!("False"));
}

#[tokio::test]
async fn test_payload_from_token() {
    let app = router("client-one", "");
    let token = issue_token(&app).await;

    let res = app
        .clone()
        .oneshot(bearer_request(PAYLOAD, Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let claims = body_json(res).await;
    assert_eq!(claims["iss"], "svcA");
    assert_eq!(claims["aud"], "appB");
    assert_eq!(claims["role"], "Admin");
    assert_eq!(claims["actor"], "batch-runner");
    assert_eq!(claims["email"], "ops@example.com");
    assert_eq!(claims["sessionId"], "");
    let window = claims["exp"].as_i64().unwrap() - claims["nbf"].as_i64().unwrap();
    assert_eq!(window, 60 * 60);
}

#[tokio::test]
async fn test_payload_invalid_is_null() {
    let app = router("client-one", "");
    let res = app
        .oneshot(bearer_request(PAYLOAD, Some("eyJhbGciOiJIUzI1NiJ9.e30.c2ln")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(res).await, Value::Null);
}

#[tokio::test]
async fn test_payload_absent_is_bad_request() {
    let app = router("client-one", "");
    let res = app.oneshot(bearer_request(PAYLOAD, None)).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await, json!("Token does not exist."));
}

#[tokio::test]
async fn test_unknown_agent_gets_empty_unauthorized() {
    let app = router("client-one", "");
    let res = app
        .oneshot(with_peer(
            request("POST", VALIDATE, "curl/8.5.0")
                .body(Body::empty())
                .unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(res).await.is_empty());
}

#[tokio::test]
async fn test_block_list_overrides_allow_list() {
    let app = router("client-one", "client-one");
    let res = app
        .oneshot(bearer_request(VALIDATE, None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admitted_by_resolved_host_label() {
    // No agent: the peer resolves to web01.corp.example.com
    let app = router("corp.example.com", "");
    let res = app
        .oneshot(with_peer(
            request("POST", VALIDATE, "").body(Body::empty()).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(res).await, json!("False"));
}

#[tokio::test]
async fn test_health_is_not_gated() {
    let app = router("", "");
    let res = app
        .oneshot(
            request("GET", "/health", "curl/8.5.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_malformed_body_is_not_acceptable() {
    let app = router("client-one", "");
    let req = request("POST", GENERATE, "client-one")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"issuer\": "))
        .unwrap();
    let res = app.oneshot(with_peer(req)).await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body_json(res).await["error"], "not_acceptable");
}

#[tokio::test]
async fn test_blank_issuer_is_not_acceptable() {
    let app = router("client-one", "");
    let req = request("POST", GENERATE, "client-one")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "audience": "appB" }).to_string()))
        .unwrap();
    let res = app.oneshot(with_peer(req)).await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);
    let body = body_json(res).await;
    // Detail stays in the exception log
    assert!(!body["error_description"].as_str().unwrap().contains("issuer"));
}

#[tokio::test]
async fn test_legacy_field_names_accepted() {
    let app = router("client-one", "");
    let req = request("POST", GENERATE, "client-one")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "Issuer": "svcB", "Audience": "appB", "SID": "s-1" }).to_string(),
        ))
        .unwrap();
    let res = app.clone().oneshot(with_peer(req)).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let Value::String(token) = body_json(res).await else {
        panic!("expected a token string");
    };

    let res = app
        .oneshot(bearer_request(PAYLOAD, Some(&token)))
        .await
        .unwrap();
    let claims = body_json(res).await;
    assert_eq!(claims["iss"], "svcB");
    assert_eq!(claims["sessionId"], "s-1");
}
