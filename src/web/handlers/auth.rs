//! Authentication handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{AccountResponse, ApiResponse, LoginRequest, LoginResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/auth/login - Exchange a username or email and password for a token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let outcome = state.auth.login(&req.credential, &req.password).await?;
    Ok(Json(ApiResponse::new(outcome.into())))
}

/// GET /api/auth/verify - Describe the account behind the presented token.
pub async fn verify(AuthUser(principal): AuthUser) -> Json<ApiResponse<AccountResponse>> {
    Json(ApiResponse::new(principal.into_account().into()))
}
