//! Test helpers for the HTTP API tests.
//!
//! Builds the full application over an in-memory database with one account
//! per role already in place.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use registrar::db::NewAccount;
use registrar::web::create_app;
use registrar::{
    Account, AppState, CredentialStore, Database, InstitutionCategory, PasswordHasher, Role,
    TokenService,
};

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";

pub const SUPERADMIN: (&str, &str) = ("superadmin", "superadmin-pass");
pub const ADMIN: (&str, &str) = ("admin", "admin-password");
pub const SMP_STAFF: (&str, &str) = ("smp.staff", "smp-password");
pub const SMA_STAFF: (&str, &str) = ("sma.staff", "sma-password");

/// Application under test.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// Create the application with the seeded accounts.
    pub async fn new() -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        let state = Arc::new(AppState::with_parts(
            db,
            TokenService::new(JWT_SECRET, 3600),
            PasswordHasher::new(1024, 1, 1).expect("Failed to create hasher"),
        ));

        let app = Self {
            server: TestServer::new(create_app(state.clone(), &[]))
                .expect("Failed to create test server"),
            state,
        };

        app.add_account(SUPERADMIN, Role::Superadmin, None).await;
        app.add_account(ADMIN, Role::Admin, None).await;
        app.add_account(SMP_STAFF, Role::Institution, Some(InstitutionCategory::Smp))
            .await;
        app.add_account(SMA_STAFF, Role::Institution, Some(InstitutionCategory::Sma))
            .await;
        app
    }

    /// Insert an account directly into the store.
    pub async fn add_account(
        &self,
        (username, password): (&str, &str),
        role: Role,
        scope: Option<InstitutionCategory>,
    ) -> Account {
        let hash = self
            .state
            .auth
            .hash_password(password)
            .await
            .expect("Failed to hash password");
        let new = NewAccount::new(
            username,
            &format!("{username}@example.com"),
            hash,
            &format!("{username} full name"),
            role,
            scope,
        )
        .expect("Invalid account");
        self.state
            .accounts
            .insert(&new)
            .await
            .expect("Failed to insert account")
    }

    /// Look up an account id by username.
    pub async fn account_id(&self, username: &str) -> String {
        self.state
            .auth
            .store()
            .find_active_by_credential(username)
            .await
            .expect("Store failure")
            .expect("Account not found")
            .id
    }

    /// Login and return the raw response.
    pub async fn login_response(&self, credential: &str, password: &str) -> TestResponse {
        self.server
            .post("/api/auth/login")
            .json(&json!({
                "credential": credential,
                "password": password
            }))
            .await
    }

    /// Login and return the session token.
    pub async fn token(&self, (username, password): (&str, &str)) -> String {
        let response = self.login_response(username, password).await;
        response.assert_status_ok();
        response.json::<Value>()["data"]["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }
}

/// Value for the `Authorization` header.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// A valid registrant submission using the form field names.
pub fn registrant_body(name: &str, institution: &str) -> Value {
    json!({
        "nama": name,
        "jenis_kelamin": "Wanita",
        "no_hp": "0812-3456-7890",
        "nama_wali": "Orang Tua",
        "alamat": "Jl. Pendidikan No. 1",
        "lembaga_pendidikan": institution
    })
}

/// Assert the error envelope's status and reason.
pub fn assert_error(response: &TestResponse, status: StatusCode, reason: Option<&str>) {
    response.assert_status(status);
    let body = response.json::<Value>();
    assert!(body["error"]["message"].is_string(), "body: {body}");
    if let Some(reason) = reason {
        assert_eq!(body["error"]["reason"], reason, "body: {body}");
    }
}
