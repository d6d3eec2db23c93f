//! Integration tests for token handling and the health endpoint.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};

use vault_auth::JwtEncoder;
use vault_core::config::AuthConfig;
use vault_core::types::UserId;

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/v1/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], "memory");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/v1/folders", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = helpers::TestApp::new();

    let response = app
        .request("GET", "/v1/folders", None, Some("not.a.jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = helpers::TestApp::new();
    let encoder = JwtEncoder::new(&app.config.auth).unwrap();
    let token = encoder
        .issue_with_ttl(UserId::generate(), chrono::Duration::minutes(-10))
        .unwrap();

    let response = app.request("GET", "/v1/folders", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_issuer_is_unauthorized() {
    let app = helpers::TestApp::new();
    let foreign = AuthConfig {
        issuer: "someone-else".to_string(),
        ..app.config.auth.clone()
    };
    let token = JwtEncoder::new(&foreign)
        .unwrap()
        .issue(UserId::generate())
        .unwrap();

    let response = app.request("GET", "/v1/folders", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let app = helpers::TestApp::new();
    let foreign = AuthConfig {
        jwt_secret: "a-completely-different-secret-0123456789".to_string(),
        ..app.config.auth.clone()
    };
    let token = JwtEncoder::new(&foreign)
        .unwrap()
        .issue(UserId::generate())
        .unwrap();

    let response = app.request("GET", "/v1/folders", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_token_is_accepted() {
    let app = helpers::TestApp::new();
    let (_, token) = app.user();
    app.create_folder(&token, None).await;

    let req = Request::builder()
        .method("GET")
        .uri("/v1/folders")
        .header("Cookie", format!("auth_token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_users_see_only_their_own_folders() {
    let app = helpers::TestApp::new();
    let (_, alice) = app.user();
    let (_, bob) = app.user();

    app.create_folder(&alice, None).await;

    let response = app.request("GET", "/v1/folders", None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data().as_array().unwrap().is_empty());
}
