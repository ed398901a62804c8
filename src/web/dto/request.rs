//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{empty_as_none, required_text, valid_password, valid_phone};
use crate::db::{InstitutionCategory, PageRequest, Role};
use crate::registrant::{Gender, RegistrantData};

/// Default page size for listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

// ============================================================================
// Auth
// ============================================================================

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email.
    #[serde(alias = "username", alias = "email")]
    #[validate(custom(function = "required_text"))]
    pub credential: String,
    /// Password.
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}

// ============================================================================
// Registrants
// ============================================================================

/// Registrant submission, used by the public form and the admin endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct RegistrantRequest {
    #[serde(alias = "nama")]
    #[validate(
        length(max = 100, message = "Maksimal 100 karakter"),
        custom(function = "required_text")
    )]
    pub name: String,
    #[serde(alias = "jenis_kelamin")]
    pub gender: Gender,
    #[serde(alias = "no_hp")]
    #[validate(custom(function = "valid_phone"))]
    pub phone: String,
    #[serde(alias = "nama_wali")]
    #[validate(
        length(max = 100, message = "Maksimal 100 karakter"),
        custom(function = "required_text")
    )]
    pub guardian_name: String,
    #[serde(alias = "alamat")]
    #[validate(
        length(max = 500, message = "Maksimal 500 karakter"),
        custom(function = "required_text")
    )]
    pub address: String,
    #[serde(alias = "lembaga_pendidikan")]
    pub institution: InstitutionCategory,
}

impl RegistrantRequest {
    /// Convert into trimmed registrant data.
    pub fn into_data(self) -> RegistrantData {
        RegistrantData {
            name: self.name,
            gender: self.gender,
            phone: self.phone,
            guardian_name: self.guardian_name,
            address: self.address,
            institution: self.institution,
        }
        .normalized()
    }
}

// ============================================================================
// Users
// ============================================================================

/// Create account request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username harus 3-50 karakter"),
        custom(function = "required_text")
    )]
    pub username: String,
    #[validate(email(message = "Format email tidak valid"))]
    pub email: String,
    #[validate(custom(function = "valid_password"))]
    pub password: String,
    #[validate(
        length(max = 100, message = "Maksimal 100 karakter"),
        custom(function = "required_text")
    )]
    pub full_name: String,
    pub role: Role,
    #[serde(default, alias = "lembaga_akses", deserialize_with = "empty_as_none")]
    pub tenant_scope: Option<InstitutionCategory>,
}

/// Full account update request.
///
/// The password is changed only when one is supplied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username harus 3-50 karakter"),
        custom(function = "required_text")
    )]
    pub username: String,
    #[validate(email(message = "Format email tidak valid"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "valid_password"))]
    pub password: Option<String>,
    #[validate(
        length(max = 100, message = "Maksimal 100 karakter"),
        custom(function = "required_text")
    )]
    pub full_name: String,
    pub role: Role,
    #[serde(default, alias = "lembaga_akses", deserialize_with = "empty_as_none")]
    pub tenant_scope: Option<InstitutionCategory>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Listing queries
// ============================================================================

fn page_request(page: Option<u32>, limit: Option<u32>) -> PageRequest {
    PageRequest::new(
        page.unwrap_or(1),
        limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
    )
}

/// Query parameters for the registrant listing.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrantListQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
    #[serde(default, alias = "lembaga", deserialize_with = "empty_as_none")]
    pub institution: Option<InstitutionCategory>,
    #[serde(default)]
    pub search: Option<String>,
}

impl RegistrantListQuery {
    pub fn page_request(&self) -> PageRequest {
        page_request(self.page, self.limit)
    }
}

/// Query parameters for the account listing.
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub search: Option<String>,
}

impl UserListQuery {
    pub fn page_request(&self) -> PageRequest {
        page_request(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registrant_json() -> serde_json::Value {
        serde_json::json!({
            "nama": "  Budi Santoso ",
            "jenis_kelamin": "Pria",
            "no_hp": " 0812-3456-7890 ",
            "nama_wali": "Siti",
            "alamat": "Jl. Merdeka 1",
            "lembaga_pendidikan": "SMP",
        })
    }

    #[test]
    fn test_registrant_request_accepts_form_field_names() {
        let req: RegistrantRequest = serde_json::from_value(registrant_json()).unwrap();
        assert!(req.validate().is_ok());

        let data = req.into_data();
        assert_eq!(data.name, "Budi Santoso");
        assert_eq!(data.phone, "0812-3456-7890");
        assert_eq!(data.institution, InstitutionCategory::Smp);
        assert_eq!(data.gender, Gender::Pria);
    }

    #[test]
    fn test_registrant_request_rejects_bad_fields() {
        let mut json = registrant_json();
        json["no_hp"] = serde_json::json!("0812");
        json["nama"] = serde_json::json!("   ");
        let req: RegistrantRequest = serde_json::from_value(json).unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn test_registrant_request_unknown_category() {
        let mut json = registrant_json();
        json["lembaga_pendidikan"] = serde_json::json!("Kampus");
        assert!(serde_json::from_value::<RegistrantRequest>(json).is_err());
    }

    #[test]
    fn test_login_request_aliases() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"admin","password":"x"}"#).unwrap();
        assert_eq!(req.credential, "admin");
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.c","password":"x"}"#).unwrap();
        assert_eq!(req.credential, "a@b.c");
        let req: LoginRequest =
            serde_json::from_str(r#"{"credential":"admin","password":""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_user_request_validation() {
        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "smp.staff",
            "email": "smp@example.com",
            "password": "secret-pass",
            "full_name": "SMP Staff",
            "role": "lembaga",
            "lembaga_akses": "SMP",
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.role, Role::Institution);
        assert_eq!(req.tenant_scope, Some(InstitutionCategory::Smp));

        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "x",
            "email": "not-an-email",
            "password": "short",
            "full_name": "X",
            "role": "admin",
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_user_request_blank_scope_is_absent() {
        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "admin2",
            "email": "admin2@example.com",
            "password": "secret-pass",
            "full_name": "Admin Dua",
            "role": "admin",
            "lembaga_akses": "",
        }))
        .unwrap();
        assert!(req.tenant_scope.is_none());

        let req: UpdateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "admin2",
            "email": "admin2@example.com",
            "full_name": "Admin Dua",
            "role": "admin",
            "tenant_scope": null,
        }))
        .unwrap();
        assert!(req.tenant_scope.is_none());

        let result: Result<CreateUserRequest, _> = serde_json::from_value(serde_json::json!({
            "username": "x.staff",
            "email": "x@example.com",
            "password": "secret-pass",
            "full_name": "X",
            "role": "lembaga",
            "lembaga_akses": "Universitas",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_user_request_defaults() {
        let req: UpdateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "admin",
            "email": "admin@example.com",
            "full_name": "Admin",
            "role": "admin",
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.is_active);
        assert!(req.password.is_none());
    }

    #[test]
    fn test_page_request_defaults_and_clamps() {
        let q = RegistrantListQuery::default();
        assert_eq!(q.page_request(), PageRequest::new(1, DEFAULT_PAGE_LIMIT));

        let q = UserListQuery {
            page: Some(0),
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(q.page_request(), PageRequest::new(1, MAX_PAGE_LIMIT));
    }
}
