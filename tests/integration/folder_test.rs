//! Integration tests for folder create, list, get, and update.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use helpers::b64;

#[tokio::test]
async fn test_create_then_list_folder() {
    let app = helpers::TestApp::new();
    let (user, token) = app.user();

    let response = app
        .request(
            "POST",
            "/v1/folders",
            Some(json!({
                "enc_name": b64("X"),
                "name_nonce": b64("n1"),
                "enc_key": b64("k1"),
                "key_nonce": b64("n2"),
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.id();
    assert!(response.data()["parent_id"].is_null());

    let response = app.request("GET", "/v1/folders", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    let folders = response.data().as_array().unwrap();
    assert_eq!(folders.len(), 1);

    let folder = &folders[0];
    assert_eq!(folder["id"], id);
    assert_eq!(folder["owner_id"], user.to_string());
    assert_eq!(folder["enc_name"], b64("X"));
    assert_eq!(folder["name_nonce"], b64("n1"));
    assert_eq!(folder["wrapped_key"], b64("k1"));
    assert_eq!(folder["key_nonce"], b64("n2"));
    assert_eq!(folder["access_level"], "OWNER");
}

#[tokio::test]
async fn test_nil_parent_is_root() {
    let app = helpers::TestApp::new();
    let (_, token) = app.user();

    let nil = Uuid::nil().to_string();
    let id = app.create_folder(&token, Some(&nil)).await;

    let response = app
        .request("GET", &format!("/v1/folders/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data()["parent_id"].is_null());
}

#[tokio::test]
async fn test_subfolder_records_parent() {
    let app = helpers::TestApp::new();
    let (_, token) = app.user();

    let parent = app.create_folder(&token, None).await;
    let child = app.create_folder(&token, Some(&parent)).await;

    let response = app
        .request("GET", &format!("/v1/folders/{child}"), None, Some(&token))
        .await;
    assert_eq!(response.data()["parent_id"], parent);
}

#[tokio::test]
async fn test_subfolder_needs_write_on_parent() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (reader, reader_token) = app.user();

    let parent = app.create_folder(&owner, None).await;
    app.share(&owner, "folder", &parent, reader, "READ").await;

    let body = json!({
        "parent_id": parent,
        "enc_name": b64("Y"),
        "name_nonce": b64("n"),
        "enc_key": b64("k"),
        "key_nonce": b64("kn"),
    });

    let response = app
        .request("POST", "/v1/folders", Some(body.clone()), Some(&reader_token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let (_, stranger) = app.user();
    let response = app
        .request("POST", "/v1/folders", Some(body), Some(&stranger))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_blob_is_bad_request() {
    let app = helpers::TestApp::new();
    let (_, token) = app.user();

    let response = app
        .request(
            "POST",
            "/v1/folders",
            Some(json!({
                "enc_name": b64("X"),
                "name_nonce": "",
                "enc_key": b64("k1"),
                "key_nonce": b64("n2"),
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "VALIDATION_ERROR");

    let response = app.request("GET", "/v1/folders", None, Some(&token)).await;
    assert!(response.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_base64_is_bad_request() {
    let app = helpers::TestApp::new();
    let (_, token) = app.user();

    let response = app
        .request(
            "POST",
            "/v1/folders",
            Some(json!({
                "enc_name": "not base64!",
                "name_nonce": b64("n1"),
                "enc_key": b64("k1"),
                "key_nonce": b64("n2"),
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let app = helpers::TestApp::new();
    let (_, token) = app.user();

    let response = app
        .request("GET", "/v1/folders/not-a-uuid", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_foreign_and_missing_folders_look_the_same() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (_, stranger) = app.user();

    let id = app.create_folder(&owner, None).await;

    let foreign = app
        .request("GET", &format!("/v1/folders/{id}"), None, Some(&stranger))
        .await;
    let missing = app
        .request(
            "GET",
            &format!("/v1/folders/{}", Uuid::now_v7()),
            None,
            Some(&stranger),
        )
        .await;

    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(foreign.body, missing.body);
}

#[tokio::test]
async fn test_update_folder_by_level() {
    let app = helpers::TestApp::new();
    let (_, owner) = app.user();
    let (writer, writer_token) = app.user();
    let (reader, reader_token) = app.user();
    let (_, stranger) = app.user();

    let id = app.create_folder(&owner, None).await;
    app.share(&owner, "folder", &id, writer, "WRITE").await;
    app.share(&owner, "folder", &id, reader, "READ").await;

    let path = format!("/v1/folders/{id}");
    let body = |name: &str| json!({ "enc_name": b64(name), "name_nonce": b64("n3") });

    let response = app
        .request("PUT", &path, Some(body("Y")), Some(&writer_token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("PUT", &path, Some(body("Z")), Some(&reader_token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("PUT", &path, Some(body("Z")), Some(&stranger))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "NOT_FOUND_OR_DENIED");

    let response = app.request("GET", &path, None, Some(&owner)).await;
    assert_eq!(response.data()["enc_name"], b64("Y"));
    assert_eq!(response.data()["wrapped_key"], b64("k1"));
}

#[tokio::test]
async fn test_deleted_folder_disappears() {
    let app = helpers::TestApp::new();
    let (_, token) = app.user();

    let id = app.create_folder(&token, None).await;
    let response = app
        .request("DELETE", &format!("/v1/resources/folder/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.request("GET", "/v1/folders", None, Some(&token)).await;
    assert!(response.data().as_array().unwrap().is_empty());

    let response = app
        .request("GET", &format!("/v1/folders/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // Soft delete keeps the row
    let folder = app
        .store
        .raw_folder(id.parse::<Uuid>().unwrap().into())
        .await
        .unwrap();
    assert!(folder.deleted);
}
