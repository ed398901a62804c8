//! Registrant handlers.
//!
//! Any authenticated role may use the admin endpoints. Institution users
//! only ever see and touch records of their own category.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::auth::{authorize_tenant, listing_scope, Principal};
use crate::registrant::{Registrant, RegistrantFilter};
use crate::web::dto::{
    ApiQuery, ApiResponse, PaginatedResponse, RegistrantListQuery, RegistrantRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

const REGISTRANT_NOT_FOUND: &str = "Data pendaftar tidak ditemukan";

/// Load a registrant the principal may access: 404 when missing, 403 when
/// it belongs to another category.
async fn load_accessible(
    state: &AppState,
    principal: &Principal,
    id: &str,
) -> Result<Registrant, ApiError> {
    let registrant = state
        .registrants
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(REGISTRANT_NOT_FOUND))?;
    authorize_tenant(principal, registrant.institution)?;
    Ok(registrant)
}

/// POST /api/register - Public registration form.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegistrantRequest>,
) -> Result<Json<ApiResponse<Registrant>>, ApiError> {
    let registrant = state.registrants.create(&req.into_data(), None).await?;

    tracing::info!(
        registrant_id = %registrant.id,
        institution = %registrant.institution,
        "Public registration received"
    );
    Ok(Json(ApiResponse::new(registrant)))
}

/// GET /api/admin/registrants - List registrants.
pub async fn list_registrants(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ApiQuery(query): ApiQuery<RegistrantListQuery>,
) -> Result<Json<PaginatedResponse<Registrant>>, ApiError> {
    let request = query.page_request();
    let filter = RegistrantFilter {
        institution: listing_scope(&principal, query.institution)?,
        search: query.search,
    };
    let page = state.registrants.list(&filter, request).await?;

    Ok(Json(PaginatedResponse::from_page(page, request)))
}

/// GET /api/admin/registrants/:id - Get a single registrant.
pub async fn get_registrant(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Registrant>>, ApiError> {
    let registrant = load_accessible(&state, &principal, &id).await?;
    Ok(Json(ApiResponse::new(registrant)))
}

/// POST /api/admin/registrants - Create a registrant on behalf of an applicant.
pub async fn create_registrant(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ValidatedJson(req): ValidatedJson<RegistrantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Registrant>>), ApiError> {
    let data = req.into_data();
    authorize_tenant(&principal, data.institution)?;

    let registrant = state.registrants.create(&data, Some(&principal.id)).await?;

    tracing::info!(actor = %principal.id, registrant_id = %registrant.id, "Registrant created");
    Ok((StatusCode::CREATED, Json(ApiResponse::new(registrant))))
}

/// PUT /api/admin/registrants/:id - Replace a registrant's fields.
pub async fn update_registrant(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<RegistrantRequest>,
) -> Result<Json<ApiResponse<Registrant>>, ApiError> {
    let existing = load_accessible(&state, &principal, &id).await?;
    let data = req.into_data();
    authorize_tenant(&principal, data.institution)?;

    // Guarded on the category just checked, so a concurrent move is not overwritten.
    let registrant = state
        .registrants
        .update(&id, &data, &principal.id, Some(existing.institution))
        .await?
        .ok_or_else(|| ApiError::not_found(REGISTRANT_NOT_FOUND))?;

    tracing::info!(actor = %principal.id, registrant_id = %registrant.id, "Registrant updated");
    Ok(Json(ApiResponse::new(registrant)))
}

/// DELETE /api/admin/registrants/:id - Delete a registrant, returning the removed record.
pub async fn delete_registrant(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Registrant>>, ApiError> {
    let existing = load_accessible(&state, &principal, &id).await?;

    if !state
        .registrants
        .delete(&id, Some(existing.institution))
        .await?
    {
        return Err(ApiError::not_found(REGISTRANT_NOT_FOUND));
    }

    tracing::info!(actor = %principal.id, registrant_id = %id, "Registrant deleted");
    Ok(Json(ApiResponse::new(existing)))
}
