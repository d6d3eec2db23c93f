//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tower::ServiceExt;

use vault_auth::JwtEncoder;
use vault_core::config::{AppConfig, GrantConflictPolicy, StoreBackend};
use vault_core::types::UserId;
use vault_database::MemoryVaultStore;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The store behind the router, for inspecting raw rows
    pub store: MemoryVaultStore,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application over an empty memory store
    pub fn new() -> Self {
        Self::with_policy(GrantConflictPolicy::Upsert)
    }

    /// Create a test application with the given re-share policy
    pub fn with_policy(policy: GrantConflictPolicy) -> Self {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;
        config.sharing.on_existing_grant = policy;

        let store = MemoryVaultStore::new();
        let state = vault_api::AppState::new(config.clone(), Arc::new(store.clone()))
            .expect("Failed to build app state");
        let encoder = JwtEncoder::new(&config.auth).expect("Failed to build encoder");

        Self {
            router: vault_api::build_app(state),
            store,
            config,
            encoder,
        }
    }

    /// A fresh user and a valid access token for them
    pub fn user(&self) -> (UserId, String) {
        let id = UserId::generate();
        let token = self.encoder.issue(id).expect("Failed to issue token");
        (id, token)
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prebuilt request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create a folder and return its id
    pub async fn create_folder(&self, token: &str, parent_id: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/v1/folders",
                Some(json!({
                    "parent_id": parent_id,
                    "enc_name": b64("X"),
                    "name_nonce": b64("n1"),
                    "enc_key": b64("k1"),
                    "key_nonce": b64("n2"),
                })),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create folder failed: {:?}",
            response.body
        );
        response.id()
    }

    /// Create an item and return its id
    pub async fn create_item(&self, token: &str, folder_id: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/v1/items",
                Some(json!({
                    "folder_id": folder_id,
                    "type": "login",
                    "enc_data": b64("d"),
                    "data_nonce": b64("dn"),
                    "enc_overview": b64("o"),
                    "overview_nonce": b64("on"),
                    "enc_key": b64("k"),
                    "key_nonce": b64("kn"),
                })),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create item failed: {:?}",
            response.body
        );
        response.id()
    }

    /// Share a resource and return the response
    pub async fn share(
        &self,
        token: &str,
        kind: &str,
        resource_id: &str,
        target: UserId,
        level: &str,
    ) -> TestResponse {
        self.request(
            "POST",
            "/v1/share",
            Some(json!({
                "target_user_id": target,
                "resource_id": resource_id,
                "resource_kind": kind,
                "enc_key": b64(&format!("key-for-{target}")),
                "key_nonce": b64("kn"),
                "access_level": level,
            })),
            Some(token),
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `data.id` as a string
    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .expect("No id in response")
            .to_string()
    }

    /// The machine-readable error code of an error body
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Base64-encode a test blob
pub fn b64(s: &str) -> String {
    STANDARD.encode(s.as_bytes())
}
