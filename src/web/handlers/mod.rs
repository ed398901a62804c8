//! API handlers.

pub mod auth;
pub mod health;
pub mod registrants;
pub mod users;

pub use auth::*;
pub use health::*;
pub use registrants::*;
pub use users::*;

use std::sync::Arc;

use crate::auth::{Authenticator, PasswordHasher, TokenService};
use crate::config::AuthConfig;
use crate::db::{AccountRepository, Database};
use crate::registrant::RegistrantRepository;
use crate::{RegistrarError, Result};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Request authentication and login.
    pub auth: Arc<Authenticator>,
    /// Account persistence.
    pub accounts: AccountRepository,
    /// Registrant persistence.
    pub registrants: RegistrantRepository,
}

impl AppState {
    /// Build the application state over an open database.
    pub fn new(db: Database, config: &AuthConfig) -> Result<Self> {
        let hasher = PasswordHasher::from_config(config)
            .map_err(|e| RegistrarError::Config(format!("auth: {e}")))?;
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_secs);
        Ok(Self::with_parts(db, tokens, hasher))
    }

    /// Build the application state from explicit auth components.
    pub fn with_parts(db: Database, tokens: TokenService, hasher: PasswordHasher) -> Self {
        let accounts = db.accounts();
        let registrants = RegistrantRepository::new(db.pool().clone());
        let auth = Arc::new(Authenticator::new(
            Arc::new(accounts.clone()),
            tokens,
            hasher,
        ));
        Self {
            db,
            auth,
            accounts,
            registrants,
        }
    }
}
