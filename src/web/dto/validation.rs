//! Validation utilities for Web API DTOs.

use std::fmt::Display;
use std::str::FromStr;

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::auth::validate_password;
use crate::registrant::is_valid_phone;
use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Deserializes the body and runs the `validator` rules on it. Malformed
/// JSON and rule violations are both answered with 400.
///
/// # Example
///
/// ```ignore
/// async fn register(
///     ValidatedJson(payload): ValidatedJson<RegistrantRequest>,
/// ) -> Result<Json<ApiResponse<Registrant>>, ApiError> {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| {
                ApiError::bad_request(format!("Format JSON tidak valid: {}", e.body_text()))
            })?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Query string extractor answering malformed parameters with the API error body.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                ApiError::bad_request(format!("Parameter query tidak valid: {}", e.body_text()))
            })?;
        Ok(ApiQuery(value))
    }
}

/// Deserialize an optional query value, treating an empty string as absent.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

// ============================================================================
// Custom Validators
// ============================================================================

/// Validate that a string does not contain control characters or NULL bytes.
pub fn no_control_chars(value: &str) -> Result<(), validator::ValidationError> {
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(validator::ValidationError::new("no_control_chars")
            .with_message("Tidak boleh mengandung karakter kontrol".into()));
    }
    Ok(())
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_empty_trimmed")
            .with_message("Wajib diisi".into()));
    }
    Ok(())
}

/// Required free text: non-blank and free of control characters.
pub fn required_text(value: &str) -> Result<(), validator::ValidationError> {
    not_empty_trimmed(value)?;
    no_control_chars(value)
}

/// Validate a registrant phone number.
pub fn valid_phone(value: &str) -> Result<(), validator::ValidationError> {
    if !is_valid_phone(value) {
        return Err(validator::ValidationError::new("phone")
            .with_message("Nomor HP harus berisi 10-15 digit".into()));
    }
    Ok(())
}

/// Validate an account password against the password policy.
pub fn valid_password(value: &str) -> Result<(), validator::ValidationError> {
    validate_password(value).map_err(|e| {
        validator::ValidationError::new("password").with_message(e.to_string().into())
    })
}
