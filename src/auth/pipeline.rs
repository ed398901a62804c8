//! Authentication and authorization pipeline.
//!
//! A request moves through token extraction, token verification and a
//! reload of the live account before any role or tenant check. Each step
//! rejects with its own `AuthError`, and the principal handed to handlers is
//! the reloaded account, never the token snapshot.

use std::ops::Deref;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::AuthError;
use super::password::PasswordHasher;
use super::policy;
use super::token::{IssuedToken, TokenService};
use crate::db::{Account, CredentialStore, InstitutionCategory, Role};

/// The live account behind an authenticated request.
#[derive(Debug, Clone)]
pub struct Principal(Account);

impl Principal {
    pub fn new(account: Account) -> Self {
        Self(account)
    }

    pub fn into_account(self) -> Account {
        self.0
    }
}

impl Deref for Principal {
    type Target = Account;

    fn deref(&self) -> &Account {
        &self.0
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: Account,
    pub token: IssuedToken,
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; an empty token counts as
/// missing.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Require the principal's role to be in `allowed` (empty admits all).
pub fn authorize(principal: &Principal, allowed: &[Role]) -> Result<(), AuthError> {
    if policy::is_role_allowed(principal.role, allowed) {
        Ok(())
    } else {
        debug!(account_id = %principal.id, role = %principal.role, "role not permitted");
        Err(AuthError::Forbidden)
    }
}

/// Require the principal to have access to records of `category`.
pub fn authorize_tenant(
    principal: &Principal,
    category: InstitutionCategory,
) -> Result<(), AuthError> {
    if policy::can_access_tenant(principal, category) {
        Ok(())
    } else {
        debug!(
            account_id = %principal.id,
            category = %category,
            "tenant scope mismatch"
        );
        Err(AuthError::Forbidden)
    }
}

/// Category filter for a listing requested by `principal`.
///
/// Institution users are pinned to their own category whatever they ask
/// for. An institution user without a scope is refused outright.
pub fn listing_scope(
    principal: &Principal,
    requested: Option<InstitutionCategory>,
) -> Result<Option<InstitutionCategory>, AuthError> {
    if principal.role.is_tenant_scoped() && principal.tenant_scope.is_none() {
        warn!(account_id = %principal.id, "institution account without tenant scope");
        return Err(AuthError::Forbidden);
    }
    Ok(policy::scoped_category(principal, requested))
}

/// Authenticates requests and logins against the credential store.
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    tokens: TokenService,
    hasher: PasswordHasher,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenService, hasher: PasswordHasher) -> Self {
        Self {
            store,
            tokens,
            hasher,
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Resolve the principal for a request from its `Authorization` header.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let token = bearer_token(authorization).ok_or(AuthError::MissingToken)?;
        let claims = self.tokens.verify(token).ok_or(AuthError::InvalidToken)?;

        let account = self
            .store
            .find_active_by_id(&claims.id)
            .await?
            .ok_or_else(|| {
                debug!(account_id = %claims.id, "token account missing or inactive");
                AuthError::InactiveAccount
            })?;

        Ok(Principal(account))
    }

    /// Check a username-or-email and password, and issue a session token.
    ///
    /// Unknown accounts and wrong passwords are indistinguishable to the
    /// caller. The last-login timestamp is recorded in the background.
    pub async fn login(&self, credential: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let Some(account) = self.store.find_active_by_credential(credential).await? else {
            debug!("login rejected: no active account for credential");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, &account.password_hash).await? {
            debug!(account_id = %account.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account)?;

        let store = Arc::clone(&self.store);
        let account_id = account.id.clone();
        tokio::spawn(async move {
            if let Err(e) = store.touch_last_login(&account_id).await {
                warn!(account_id = %account_id, error = %e, "failed to record last login");
            }
        });

        info!(account_id = %account.id, role = %account.role, "login succeeded");
        Ok(LoginOutcome { account, token })
    }

    /// Hash a password off the async runtime.
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    async fn verify_password(&self, password: &str, digest: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let digest = digest.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}
