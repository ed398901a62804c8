//! Credential store abstraction.
//!
//! The authentication pipeline and account management reach the account
//! table only through `CredentialStore`, so the store handle can be injected
//! (SQLite in production, an in-memory fake in tests).

use async_trait::async_trait;

use super::account::{Account, AccountUpdate, NewAccount, Role};
use crate::Result;

/// Outcome of a guarded account mutation.
#[derive(Debug, Clone)]
pub enum AccountChange {
    /// The change was applied; carries the account as stored afterwards.
    Updated(Account),
    /// No account with the given id.
    NotFound,
    /// Refused: the change would leave no active superadmin.
    LastSuperadmin,
}

/// Persistence operations on accounts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Active account by id.
    async fn find_active_by_id(&self, id: &str) -> Result<Option<Account>>;

    /// Active account whose username or email matches `credential`
    /// (case-insensitive).
    async fn find_active_by_credential(&self, credential: &str) -> Result<Option<Account>>;

    /// Insert a new active account.
    ///
    /// Fails with `RegistrarError::Conflict` when the username or email is taken.
    async fn insert(&self, account: &NewAccount) -> Result<Account>;

    /// Replace an account's mutable fields.
    ///
    /// Demoting or deactivating the last active superadmin is refused
    /// atomically with `AccountChange::LastSuperadmin`.
    async fn update(&self, id: &str, update: &AccountUpdate) -> Result<AccountChange>;

    /// Number of active accounts with the given role.
    async fn count_active_by_role(&self, role: Role) -> Result<i64>;

    /// Soft-delete an account.
    ///
    /// The last-superadmin check and the write happen in one statement, so
    /// concurrent deactivations cannot remove every superadmin.
    async fn deactivate(&self, id: &str) -> Result<AccountChange>;

    /// Record a successful login.
    async fn touch_last_login(&self, id: &str) -> Result<()>;
}
