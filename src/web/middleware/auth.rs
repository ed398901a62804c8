//! Authentication middleware and extractor.

use std::sync::Arc;

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};

use crate::auth::{Authenticator, Principal};
use crate::web::error::ApiError;

/// Make the authenticator available to extractors through request extensions.
pub async fn inject_authenticator(
    authenticator: Arc<Authenticator>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    req.extensions_mut().insert(authenticator);
    next.run(req).await
}

/// Extractor for authenticated requests.
///
/// Resolves the bearer token to the live account. Handlers receive the
/// reloaded account, so a deactivated or deleted account is refused even
/// while its token is still unexpired.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = parts
            .extensions
            .get::<Arc<Authenticator>>()
            .cloned()
            .ok_or_else(|| ApiError::internal("Authenticator not configured"))?;

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let principal = authenticator.authenticate(header).await?;
        Ok(AuthUser(principal))
    }
}
