//! Response DTOs for Web API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::LoginOutcome;
use crate::db::{Account, InstitutionCategory, Page, PageRequest, Role};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Response data.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        let total = u64::try_from(total).unwrap_or(0);
        let limit = u64::from(request.limit);
        Self {
            data,
            meta: PaginationMeta {
                page: request.page,
                limit: request.limit,
                total,
                total_pages: total.div_ceil(limit),
            },
        }
    }

    /// Build a response from a repository page, converting each item.
    pub fn from_page<U>(page: Page<U>, request: PageRequest) -> Self
    where
        U: Into<T>,
    {
        let items = page.items.into_iter().map(Into::into).collect();
        Self::new(items, request, page.total)
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total number of matching items.
    pub total: u64,
    /// Number of pages at this page size.
    pub total_pages: u64,
}

// ============================================================================
// Auth / Users
// ============================================================================

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token (JWT).
    pub token: String,
    /// Always "Bearer".
    pub token_type: &'static str,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// Seconds until expiry.
    pub expires_in: i64,
    /// The logged-in account.
    pub user: AccountResponse,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        let expires_in = (outcome.token.expires_at - Utc::now()).num_seconds().max(0);
        Self {
            token: outcome.token.token,
            token_type: "Bearer",
            expires_at: outcome.token.expires_at,
            expires_in,
            user: outcome.account.into(),
        }
    }
}

/// Account as exposed by the API. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub tenant_scope: Option<InstitutionCategory>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            full_name: account.full_name,
            role: account.role,
            tenant_scope: account.tenant_scope,
            is_active: account.is_active,
            created_at: account.created_at,
            last_login: account.last_login,
        }
    }
}

/// Store health check response.
#[derive(Debug, Serialize)]
pub struct StoreHealthResponse {
    pub status: &'static str,
    pub schema_version: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_meta() {
        let resp = PaginatedResponse::new(vec![1, 2, 3], PageRequest::new(2, 3), 7);
        assert_eq!(resp.meta.page, 2);
        assert_eq!(resp.meta.limit, 3);
        assert_eq!(resp.meta.total, 7);
        assert_eq!(resp.meta.total_pages, 3);

        let empty: PaginatedResponse<i32> = PaginatedResponse::new(vec![], PageRequest::new(1, 10), 0);
        assert_eq!(empty.meta.total_pages, 0);
    }

    #[test]
    fn test_account_response_has_no_hash() {
        let account = Account {
            id: "id-1".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            full_name: "Admin".to_string(),
            role: Role::Admin,
            tenant_scope: None,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };
        let json = serde_json::to_value(AccountResponse::from(account)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
        assert_eq!(json["tenant_scope"], serde_json::Value::Null);
    }
}
