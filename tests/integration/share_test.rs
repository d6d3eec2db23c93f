//! Integration tests for sharing, revocation, and grant listing.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use vault_core::config::GrantConflictPolicy;
use vault_core::types::UserId;
use vault_entity::{AccessLevel, ResourceKind};

use helpers::b64;

#[tokio::test]
async fn test_shared_folder_appears_with_recipient_key() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (reader, reader_token) = app.user();

    let id = app.create_folder(&owner, None).await;
    let response = app.share(&owner, "folder", &id, reader, "READ").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", "/v1/folders", None, Some(&reader_token))
        .await;
    let folders = response.data().as_array().unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0]["id"], id);
    assert_eq!(folders[0]["access_level"], "READ");
    assert_eq!(folders[0]["wrapped_key"], b64(&format!("key-for-{reader}")));
}

#[tokio::test]
async fn test_reshare_replaces_grant() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (target, target_token) = app.user();

    let id = app.create_item(&owner, None).await;
    app.share(&owner, "item", &id, target, "READ").await;
    let response = app.share(&owner, "item", &id, target, "WRITE").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", &format!("/v1/items/{id}"), None, Some(&target_token))
        .await;
    assert_eq!(response.data()["access_level"], "WRITE");

    let grants = app
        .store
        .raw_grants(ResourceKind::Item, id.parse::<Uuid>().unwrap())
        .await;
    assert_eq!(grants.iter().filter(|g| g.user_id == target).count(), 1);
}

#[tokio::test]
async fn test_reshare_conflict_under_reject_policy() {
    let app = helpers::TestApp::with_policy(GrantConflictPolicy::Reject);
    let (_, owner) = app.user();
    let (target, _) = app.user();

    let id = app.create_folder(&owner, None).await;
    let first = app.share(&owner, "folder", &id, target, "READ").await;
    assert_eq!(first.status, StatusCode::NO_CONTENT);

    let second = app.share(&owner, "folder", &id, target, "WRITE").await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error(), "KEY_CONFLICT");
}

#[tokio::test]
async fn test_only_owner_may_share() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (writer, writer_token) = app.user();
    let (other, _) = app.user();

    let id = app.create_folder(&owner, None).await;
    app.share(&owner, "folder", &id, writer, "WRITE").await;

    let response = app.share(&writer_token, "folder", &id, other, "READ").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "ACCESS_DENIED");
}

#[tokio::test]
async fn test_share_with_self_rejected() {
    let app = helpers::TestApp::new();
    let (owner_id, owner) = app.user();

    let id = app.create_folder(&owner, None).await;
    let response = app.share(&owner, "folder", &id, owner_id, "READ").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_owner_share_with_self_is_forbidden() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (reader, reader_token) = app.user();

    let id = app.create_folder(&owner, None).await;
    app.share(&owner, "folder", &id, reader, "READ").await;

    let response = app.share(&reader_token, "folder", &id, reader, "OWNER").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "ACCESS_DENIED");
}

#[tokio::test]
async fn test_uppercase_resource_kind_accepted() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (target, target_token) = app.user();

    let folder = app.create_folder(&owner, None).await;
    let item = app.create_item(&owner, None).await;
    let response = app.share(&owner, "FOLDER", &folder, target, "READ").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = app.share(&owner, "ITEM", &item, target, "WRITE").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", &format!("/v1/folders/{folder}"), None, Some(&target_token))
        .await;
    assert_eq!(response.data()["access_level"], "READ");
    let response = app
        .request("GET", &format!("/v1/items/{item}"), None, Some(&target_token))
        .await;
    assert_eq!(response.data()["access_level"], "WRITE");
}

#[tokio::test]
async fn test_share_with_unknown_level_rejected() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (target, _) = app.user();

    let id = app.create_folder(&owner, None).await;
    let response = app.share(&owner, "folder", &id, target, "ADMIN").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_share_owner_transfers_ownership() {
    let app = helpers::TestApp::new();
    let (_, alice) = app.user();
    let (bob, bob_token) = app.user();

    let id = app.create_folder(&alice, None).await;
    let response = app.share(&alice, "folder", &id, bob, "OWNER").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let grants = app
        .store
        .raw_grants(ResourceKind::Folder, id.parse::<Uuid>().unwrap())
        .await;
    let owners: Vec<_> = grants
        .iter()
        .filter(|g| g.access_level == AccessLevel::Owner)
        .collect();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].user_id, bob);

    // The previous owner keeps WRITE but can no longer delete
    let path = format!("/v1/resources/folder/{id}");
    let response = app.request("DELETE", &path, None, Some(&alice)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("DELETE", &path, None, Some(&bob_token)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_revoke_removes_access() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (target, target_token) = app.user();

    let id = app.create_folder(&owner, None).await;
    app.share(&owner, "folder", &id, target, "WRITE").await;

    let response = app
        .request(
            "POST",
            "/v1/share/revoke",
            Some(json!({
                "target_user_id": target,
                "resource_id": id,
                "resource_kind": "folder",
            })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", &format!("/v1/folders/{id}"), None, Some(&target_token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_revoke_without_kind_finds_item() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (target, target_token) = app.user();

    let id = app.create_item(&owner, None).await;
    app.share(&owner, "item", &id, target, "READ").await;

    let response = app
        .request(
            "POST",
            "/v1/share/revoke",
            Some(json!({ "target_user_id": target, "resource_id": id })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.request("GET", "/v1/items", None, Some(&target_token)).await;
    assert!(response.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_revoke_owner_grant_rejected() {
    let app = helpers::TestApp::new();
    let (owner_id, owner) = app.user();

    let id = app.create_folder(&owner, None).await;
    let response = app
        .request(
            "POST",
            "/v1/share/revoke",
            Some(json!({
                "target_user_id": owner_id,
                "resource_id": id,
                "resource_kind": "folder",
            })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.request("GET", "/v1/folders", None, Some(&owner)).await;
    assert_eq!(response.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_revoke_missing_grant() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();

    let id = app.create_item(&owner, None).await;
    let response = app
        .request(
            "POST",
            "/v1/share/revoke",
            Some(json!({
                "target_user_id": UserId::generate(),
                "resource_id": id,
                "resource_kind": "item",
            })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "NOT_FOUND_OR_DENIED");
}

#[tokio::test]
async fn test_list_grants_is_owner_only() {
    let app = helpers::TestApp::new();
    let (owner_id, owner) = app.user();
    let (reader, reader_token) = app.user();

    let id = app.create_folder(&owner, None).await;
    app.share(&owner, "folder", &id, reader, "READ").await;
    let path = format!("/v1/resources/folders/{id}/grants");

    let response = app.request("GET", &path, None, Some(&owner)).await;
    assert_eq!(response.status, StatusCode::OK);
    let grants = response.data().as_array().unwrap();
    assert_eq!(grants.len(), 2);
    assert!(grants.iter().all(|g| g.get("enc_key").is_none()));
    assert!(
        grants
            .iter()
            .any(|g| g["user_id"] == owner_id.to_string() && g["access_level"] == "OWNER")
    );

    let response = app.request("GET", &path, None, Some(&reader_token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_concurrent_shares_converge() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (target, _) = app.user();

    let id = app.create_folder(&owner, None).await;
    let (a, b) = futures::join!(
        app.share(&owner, "folder", &id, target, "READ"),
        app.share(&owner, "folder", &id, target, "WRITE"),
    );
    assert_eq!(a.status, StatusCode::NO_CONTENT);
    assert_eq!(b.status, StatusCode::NO_CONTENT);

    let grants = app
        .store
        .raw_grants(ResourceKind::Folder, id.parse::<Uuid>().unwrap())
        .await;
    assert_eq!(grants.iter().filter(|g| g.user_id == target).count(), 1);
}
