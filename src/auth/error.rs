//! Authentication and authorization errors.

use axum::http::StatusCode;
use thiserror::Error;

use crate::RegistrarError;

/// Rejection produced by the authentication/authorization pipeline.
///
/// Display strings are the user-facing messages; `reason()` is the stable
/// machine-readable tag sent alongside them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization: Bearer` header, or a malformed one.
    #[error("Token akses tidak ditemukan")]
    MissingToken,

    /// Bad signature, malformed token or expired token.
    #[error("Token tidak valid atau sudah kedaluwarsa")]
    InvalidToken,

    /// The token's account no longer exists or was deactivated.
    #[error("Akun tidak ditemukan atau tidak aktif")]
    InactiveAccount,

    /// Unknown credential or wrong password. The two cases are not distinguished.
    #[error("Username/email atau password salah")]
    InvalidCredentials,

    /// Role or tenant scope does not permit the operation.
    #[error("Anda tidak memiliki akses untuk operasi ini")]
    Forbidden,

    /// The operation would leave no active superadmin.
    #[error("Tidak dapat menonaktifkan superadmin terakhir")]
    LastSuperadmin,

    /// The credential store failed.
    #[error("Terjadi kesalahan server")]
    Store(String),

    /// Token signing or password hashing failed.
    #[error("Terjadi kesalahan server")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::InactiveAccount => "inactive_or_missing_account",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Forbidden => "forbidden",
            AuthError::LastSuperadmin => "last_superadmin",
            AuthError::Store(_) => "store_failure",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::InactiveAccount
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden | AuthError::LastSuperadmin => StatusCode::FORBIDDEN,
            AuthError::Store(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RegistrarError> for AuthError {
    fn from(err: RegistrarError) -> Self {
        AuthError::Store(err.to_string())
    }
}
