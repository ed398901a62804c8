//! Web API Registrant Tests
//!
//! Integration tests for the public registration form and registrant
//! administration with tenant scoping.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{assert_error, bearer, registrant_body, TestApp, ADMIN, SMA_STAFF, SMP_STAFF};

/// Submit through the public form and return the new record's id.
async fn register(app: &TestApp, name: &str, institution: &str) -> String {
    let response = app
        .server
        .post("/api/register")
        .json(&registrant_body(name, institution))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_public_register() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/register")
        .json(&registrant_body("  Budi Santoso  ", "SMP"))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["data"]["name"], "Budi Santoso");
    assert_eq!(body["data"]["institution"], "SMP");
    assert_eq!(body["data"]["gender"], "Wanita");
    assert_eq!(body["data"]["created_by"], Value::Null);
}

#[tokio::test]
async fn test_public_register_validation() {
    let app = TestApp::new().await;

    let mut body = registrant_body("Budi", "SMP");
    body["no_hp"] = json!("0812");
    let response = app.server.post("/api/register").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<Value>();
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    assert!(error["error"]["details"]["phone"].is_array());

    let response = app
        .server
        .post("/api/register")
        .json(&registrant_body("Budi", "Universitas"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/register")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_endpoints_require_token() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/admin/registrants").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, Some("missing_token"));
}

#[tokio::test]
async fn test_list_pinned_to_own_scope() {
    let app = TestApp::new().await;
    register(&app, "Siswa SMP 1", "SMP").await;
    register(&app, "Siswa SMP 2", "SMP").await;
    register(&app, "Siswa SMA", "SMA").await;

    let token = app.token(SMP_STAFF).await;

    // Asking for another category still yields the own category only.
    let response = app
        .server
        .get("/api/admin/registrants?institution=SMA")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["meta"]["total"], 2);
    for item in body["data"].as_array().unwrap() {
        assert_eq!(item["institution"], "SMP");
    }
}

#[tokio::test]
async fn test_admin_lists_everything_and_filters() {
    let app = TestApp::new().await;
    register(&app, "Andi", "SD").await;
    register(&app, "Bela", "SMP").await;
    register(&app, "Citra", "Non Formal").await;

    let token = app.token(ADMIN).await;

    let response = app
        .server
        .get("/api/admin/registrants")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["meta"]["total"], 3);
    // Newest first.
    assert_eq!(body["data"][0]["name"], "Citra");

    let response = app
        .server
        .get("/api/admin/registrants?institution=Non%20Formal")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["meta"]["total"], 1);

    let response = app
        .server
        .get("/api/admin/registrants?search=bel")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Bela");
}

#[tokio::test]
async fn test_list_pagination() {
    let app = TestApp::new().await;
    for i in 0..5 {
        register(&app, &format!("Siswa {i}"), "SMK").await;
    }
    let token = app.token(ADMIN).await;

    let response = app
        .server
        .get("/api/admin/registrants?page=3&limit=2")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["page"], 3);
    assert_eq!(body["meta"]["limit"], 2);
    assert_eq!(body["meta"]["total"], 5);
    assert_eq!(body["meta"]["total_pages"], 3);
}

#[tokio::test]
async fn test_get_outside_scope_forbidden() {
    let app = TestApp::new().await;
    let sma_id = register(&app, "Siswa SMA", "SMA").await;

    let token = app.token(SMP_STAFF).await;
    let response = app
        .server
        .get(&format!("/api/admin/registrants/{sma_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, Some("forbidden"));

    let token = app.token(SMA_STAFF).await;
    let response = app
        .server
        .get(&format!("/api/admin/registrants/{sma_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let app = TestApp::new().await;
    let token = app.token(SMP_STAFF).await;

    let response = app
        .server
        .get("/api/admin/registrants/does-not-exist")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, None);
}

#[tokio::test]
async fn test_create_checks_tenant() {
    let app = TestApp::new().await;
    let token = app.token(SMP_STAFF).await;

    let response = app
        .server
        .post("/api/admin/registrants")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&registrant_body("Siswa", "SMA"))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, Some("forbidden"));

    let response = app
        .server
        .post("/api/admin/registrants")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&registrant_body("Siswa", "SMP"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["created_by"], app.account_id(SMP_STAFF.0).await);
}

#[tokio::test]
async fn test_update_registrant() {
    let app = TestApp::new().await;
    let id = register(&app, "Siswa", "SMP").await;
    let token = app.token(SMP_STAFF).await;

    let mut body = registrant_body("Siswa Baru", "SMP");
    body["alamat"] = json!("Jl. Baru 2");
    let response = app
        .server
        .put(&format!("/api/admin/registrants/{id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&body)
        .await;
    response.assert_status_ok();

    let data = &response.json::<Value>()["data"];
    assert_eq!(data["name"], "Siswa Baru");
    assert_eq!(data["address"], "Jl. Baru 2");
    assert_eq!(data["updated_by"], app.account_id(SMP_STAFF.0).await);
    assert!(data["updated_at"].is_string());
}

#[tokio::test]
async fn test_update_cannot_move_out_of_scope() {
    let app = TestApp::new().await;
    let id = register(&app, "Siswa", "SMP").await;
    let token = app.token(SMP_STAFF).await;

    let response = app
        .server
        .put(&format!("/api/admin/registrants/{id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&registrant_body("Siswa", "SMA"))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, Some("forbidden"));

    let stored = app.state.registrants.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.institution.as_str(), "SMP");
}

#[tokio::test]
async fn test_delete_registrant() {
    let app = TestApp::new().await;
    let smp_id = register(&app, "Siswa SMP", "SMP").await;
    let sma_id = register(&app, "Siswa SMA", "SMA").await;
    let token = app.token(SMP_STAFF).await;

    let response = app
        .server
        .delete(&format!("/api/admin/registrants/{sma_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, Some("forbidden"));
    assert!(app.state.registrants.find_by_id(&sma_id).await.unwrap().is_some());

    let response = app
        .server
        .delete(&format!("/api/admin/registrants/{smp_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert!(app.state.registrants.find_by_id(&smp_id).await.unwrap().is_none());

    let response = app
        .server
        .delete(&format!("/api/admin/registrants/{smp_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, None);
}
