//! Account repository.
//!
//! SQLite implementation of `CredentialStore` plus the listing queries used
//! by the account admin API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::account::{Account, AccountUpdate, NewAccount, Role};
use super::store::{AccountChange, CredentialStore};
use super::{is_unique_violation, like_pattern, normalize_identifier, Page, PageRequest};
use crate::{RegistrarError, Result};

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, full_name, role, tenant_scope, \
                               is_active, created_at, last_login";

/// Guard appended to mutations that may remove superadmin privileges.
///
/// Holds when the target is not an active superadmin, or another active
/// superadmin remains. Evaluated inside the mutating statement.
const SUPERADMIN_GUARD: &str = "(role <> 'superadmin' OR is_active = 0 \
     OR (SELECT COUNT(*) FROM accounts WHERE role = 'superadmin' AND is_active = 1) > 1)";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    full_name: String,
    role: String,
    tenant_scope: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl AccountRow {
    /// Unknown role or scope strings are rejected rather than mapped to a
    /// default.
    fn into_account(self) -> Result<Account> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| RegistrarError::Database(format!("account {}: {e}", self.id)))?;
        let tenant_scope = self
            .tenant_scope
            .map(|s| s.parse())
            .transpose()
            .map_err(|e| RegistrarError::Database(format!("account {}: {e}", self.id)))?;

        Ok(Account {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            role,
            tenant_scope,
            is_active: self.is_active,
            created_at: self.created_at,
            last_login: self.last_login,
        })
    }
}

/// Filter for account listings.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Only accounts with this role.
    pub role: Option<Role>,
    /// Substring matched against username, email and full name.
    pub search: Option<String>,
}

impl AccountFilter {
    fn push_where(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" WHERE 1 = 1");
        if let Some(role) = self.role {
            query.push(" AND role = ");
            query.push_bind(role.as_str());
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            query.push(" AND (username LIKE ");
            query.push_bind(pattern.clone());
            query.push(" ESCAPE '\\' OR email LIKE ");
            query.push_bind(pattern.clone());
            query.push(" ESCAPE '\\' OR full_name LIKE ");
            query.push_bind(pattern);
            query.push(" ESCAPE '\\')");
        }
    }
}

/// Repository for account persistence.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Create a new AccountRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an account by id, active or not.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RegistrarError::Database(e.to_string()))?;

        row.map(AccountRow::into_account).transpose()
    }

    /// List accounts, newest first.
    pub async fn list(&self, filter: &AccountFilter, page: PageRequest) -> Result<Page<Account>> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM accounts");
        filter.push_where(&mut count_query);
        let (total,): (i64,) = count_query
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RegistrarError::Database(e.to_string()))?;

        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {ACCOUNT_COLUMNS} FROM accounts"));
        filter.push_where(&mut query);
        query.push(" ORDER BY created_at DESC, id LIMIT ");
        query.push_bind(i64::from(page.limit));
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let rows = query
            .build_query_as::<AccountRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RegistrarError::Database(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(AccountRow::into_account)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page { items, total })
    }

    /// Resolve a guarded mutation that touched no row.
    async fn explain_refusal(&self, id: &str) -> Result<AccountChange> {
        match self.find_by_id(id).await? {
            Some(_) => Ok(AccountChange::LastSuperadmin),
            None => Ok(AccountChange::NotFound),
        }
    }

    async fn reload(&self, id: &str) -> Result<AccountChange> {
        match self.find_by_id(id).await? {
            Some(account) => Ok(AccountChange::Updated(account)),
            None => Ok(AccountChange::NotFound),
        }
    }
}

fn map_write_error(e: sqlx::Error) -> RegistrarError {
    if is_unique_violation(&e) {
        RegistrarError::Conflict("Username atau email".to_string())
    } else {
        RegistrarError::Database(e.to_string())
    }
}

#[async_trait]
impl CredentialStore for AccountRepository {
    async fn find_active_by_id(&self, id: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ? AND is_active = 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RegistrarError::Database(e.to_string()))?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_active_by_credential(&self, credential: &str) -> Result<Option<Account>> {
        let credential = normalize_identifier(credential);
        if credential.is_empty() {
            return Ok(None);
        }

        // A username match wins over an email match on another account.
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts
             WHERE (username = ? OR email = ?) AND is_active = 1
             ORDER BY CASE WHEN username = ? THEN 0 ELSE 1 END
             LIMIT 1"
        ))
        .bind(&credential)
        .bind(&credential)
        .bind(&credential)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RegistrarError::Database(e.to_string()))?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn insert(&self, account: &NewAccount) -> Result<Account> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO accounts (id, username, email, password_hash, full_name, role, tenant_scope, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?)",
        )
        .bind(&id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(account.role.as_str())
        .bind(account.tenant_scope.map(|s| s.as_str()))
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(Account {
            id,
            username: account.username.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
            tenant_scope: account.tenant_scope,
            is_active: true,
            created_at,
            last_login: None,
        })
    }

    async fn update(&self, id: &str, update: &AccountUpdate) -> Result<AccountChange> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE accounts SET ");
        let mut separated = query.separated(", ");

        separated.push("username = ");
        separated.push_bind_unseparated(update.username.clone());
        separated.push("email = ");
        separated.push_bind_unseparated(update.email.clone());
        separated.push("full_name = ");
        separated.push_bind_unseparated(update.full_name.clone());
        separated.push("role = ");
        separated.push_bind_unseparated(update.role.as_str());
        separated.push("tenant_scope = ");
        separated.push_bind_unseparated(update.tenant_scope.map(|s| s.as_str()));
        separated.push("is_active = ");
        separated.push_bind_unseparated(update.is_active);
        if let Some(ref hash) = update.password_hash {
            separated.push("password_hash = ");
            separated.push_bind_unseparated(hash.clone());
        }

        query.push(" WHERE id = ");
        query.push_bind(id.to_string());
        if update.removes_superadmin() {
            query.push(" AND ");
            query.push(SUPERADMIN_GUARD);
        }

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return self.explain_refusal(id).await;
        }

        self.reload(id).await
    }

    async fn count_active_by_role(&self, role: Role) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE role = ? AND is_active = 1")
                .bind(role.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RegistrarError::Database(e.to_string()))?;
        Ok(count)
    }

    async fn deactivate(&self, id: &str) -> Result<AccountChange> {
        let result = sqlx::query(&format!(
            "UPDATE accounts SET is_active = 0 WHERE id = ? AND {SUPERADMIN_GUARD}"
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RegistrarError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return self.explain_refusal(id).await;
        }

        self.reload(id).await
    }

    async fn touch_last_login(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE accounts SET last_login = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RegistrarError::Database(e.to_string()))?;
        Ok(())
    }
}
