//! Account management handlers. Every route here is superadmin-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::auth::{authorize, policy, AuthError, Principal};
use crate::db::{AccountChange, AccountFilter, AccountUpdate, CredentialStore, NewAccount, Role};
use crate::web::dto::{
    AccountResponse, ApiQuery, ApiResponse, CreateUserRequest, PaginatedResponse,
    UpdateUserRequest, UserListQuery, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

const USER_NOT_FOUND: &str = "User tidak ditemukan";

fn require_superadmin(principal: &Principal) -> Result<(), ApiError> {
    authorize(principal, &[Role::Superadmin]).map_err(ApiError::from)
}

fn change_response(change: AccountChange) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    match change {
        AccountChange::Updated(account) => Ok(Json(ApiResponse::new(account.into()))),
        AccountChange::NotFound => Err(ApiError::not_found(USER_NOT_FOUND)),
        AccountChange::LastSuperadmin => Err(AuthError::LastSuperadmin.into()),
    }
}

/// GET /api/admin/users - List accounts.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> Result<Json<PaginatedResponse<AccountResponse>>, ApiError> {
    require_superadmin(&principal)?;

    let request = query.page_request();
    let filter = AccountFilter {
        role: query.role,
        search: query.search,
    };
    let page = state.accounts.list(&filter, request).await?;

    Ok(Json(PaginatedResponse::from_page(page, request)))
}

/// GET /api/admin/users/:id - Get a single account.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    require_superadmin(&principal)?;

    let account = state
        .accounts
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(Json(ApiResponse::new(account.into())))
}

/// POST /api/admin/users - Create an account.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ApiError> {
    require_superadmin(&principal)?;

    let hash = state.auth.hash_password(&req.password).await?;
    let new = NewAccount::new(
        &req.username,
        &req.email,
        hash,
        &req.full_name,
        req.role,
        req.tenant_scope,
    )?;
    let account = state.accounts.insert(&new).await?;

    tracing::info!(
        actor = %principal.id,
        account_id = %account.id,
        role = %account.role,
        "Account created"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::new(account.into()))))
}

/// PUT /api/admin/users/:id - Replace an account's fields.
///
/// Refused with 403 when it would demote or deactivate the last active
/// superadmin.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    require_superadmin(&principal)?;

    let mut update = AccountUpdate::new(
        &req.username,
        &req.email,
        &req.full_name,
        req.role,
        req.tenant_scope,
    )?
    .is_active(req.is_active);
    if let Some(password) = req.password.as_deref() {
        update = update.password_hash(state.auth.hash_password(password).await?);
    }

    let change = state.accounts.update(&id, &update).await?;
    if let AccountChange::Updated(account) = &change {
        tracing::info!(actor = %principal.id, account_id = %account.id, "Account updated");
    }
    change_response(change)
}

/// DELETE /api/admin/users/:id - Deactivate an account.
///
/// Accounts are soft-deleted; the last active superadmin cannot be removed.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    require_superadmin(&principal)?;

    let target = state
        .accounts
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
    let superadmins = state.accounts.count_active_by_role(Role::Superadmin).await?;
    if !policy::can_delete_account(&target, superadmins) {
        return Err(AuthError::LastSuperadmin.into());
    }

    let change = state.accounts.deactivate(&id).await?;
    if let AccountChange::Updated(account) = &change {
        tracing::info!(actor = %principal.id, account_id = %account.id, "Account deactivated");
    }
    change_response(change)
}
