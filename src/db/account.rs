//! Account model.
//!
//! Defines the `Account` entity together with the closed `Role` and
//! `InstitutionCategory` enumerations used for access control.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RegistrarError, Result};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access, including account management.
    #[serde(rename = "superadmin")]
    Superadmin,
    /// Access to every registrant, no account management.
    #[serde(rename = "admin")]
    Admin,
    /// Access restricted to the registrants of one institution category.
    #[serde(rename = "lembaga")]
    Institution,
}

impl Role {
    /// Every role, in descending order of privilege.
    pub const ALL: [Role; 3] = [Role::Superadmin, Role::Admin, Role::Institution];

    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Institution => "lembaga",
        }
    }

    /// Whether accounts with this role are confined to a tenant scope.
    pub fn is_tenant_scoped(&self) -> bool {
        matches!(self, Role::Institution)
    }

    /// Normalize the tenant scope stored for an account with this role.
    ///
    /// Institution accounts must carry a scope; every other role has its scope
    /// cleared.
    pub fn scope_for(
        &self,
        scope: Option<InstitutionCategory>,
    ) -> Result<Option<InstitutionCategory>> {
        match self {
            Role::Institution => scope.map(Some).ok_or_else(|| {
                RegistrarError::Validation("Akun lembaga wajib memiliki lembaga akses".to_string())
            }),
            Role::Superadmin | Role::Admin => Ok(None),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Role::Superadmin),
            "admin" => Ok(Role::Admin),
            "lembaga" => Ok(Role::Institution),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// Institution category (tenant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstitutionCategory {
    #[serde(rename = "SD")]
    Sd,
    #[serde(rename = "SMP")]
    Smp,
    #[serde(rename = "SMA")]
    Sma,
    #[serde(rename = "SMK")]
    Smk,
    #[serde(rename = "Non Formal")]
    NonFormal,
}

impl InstitutionCategory {
    pub const ALL: [InstitutionCategory; 5] = [
        InstitutionCategory::Sd,
        InstitutionCategory::Smp,
        InstitutionCategory::Sma,
        InstitutionCategory::Smk,
        InstitutionCategory::NonFormal,
    ];

    /// Convert category to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstitutionCategory::Sd => "SD",
            InstitutionCategory::Smp => "SMP",
            InstitutionCategory::Sma => "SMA",
            InstitutionCategory::Smk => "SMK",
            InstitutionCategory::NonFormal => "Non Formal",
        }
    }
}

impl fmt::Display for InstitutionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InstitutionCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown institution category: {s}"))
    }
}

/// A staff account able to sign in to the admin API.
///
/// `password_hash` is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub tenant_scope: Option<InstitutionCategory>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    /// Check if this account is a superadmin.
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Login username. Trimmed and lower-cased on construction.
    pub username: String,
    /// Email address. Trimmed and lower-cased on construction.
    pub email: String,
    /// Password hash (PHC string).
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub tenant_scope: Option<InstitutionCategory>,
}

impl NewAccount {
    /// Create a new account description.
    ///
    /// Fails when `role` requires a tenant scope and none is given. A scope
    /// passed for an unscoped role is dropped.
    pub fn new(
        username: &str,
        email: &str,
        password_hash: impl Into<String>,
        full_name: &str,
        role: Role,
        tenant_scope: Option<InstitutionCategory>,
    ) -> Result<Self> {
        Ok(Self {
            username: normalize_identifier(username),
            email: normalize_identifier(email),
            password_hash: password_hash.into(),
            full_name: full_name.trim().to_string(),
            role,
            tenant_scope: role.scope_for(tenant_scope)?,
        })
    }
}

/// Full replacement of an account's mutable fields.
///
/// Built with `AccountUpdate::new` so the scope invariant holds before the
/// store sees it. `password_hash` is only replaced when set.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub tenant_scope: Option<InstitutionCategory>,
    pub is_active: bool,
    pub password_hash: Option<String>,
}

impl AccountUpdate {
    pub fn new(
        username: &str,
        email: &str,
        full_name: &str,
        role: Role,
        tenant_scope: Option<InstitutionCategory>,
    ) -> Result<Self> {
        Ok(Self {
            username: normalize_identifier(username),
            email: normalize_identifier(email),
            full_name: full_name.trim().to_string(),
            role,
            tenant_scope: role.scope_for(tenant_scope)?,
            is_active: true,
            password_hash: None,
        })
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    /// Whether applying this update would leave the account without
    /// superadmin privileges.
    pub fn removes_superadmin(&self) -> bool {
        self.role != Role::Superadmin || !self.is_active
    }
}

/// Normalize a username or email for storage and lookup.
pub fn normalize_identifier(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_strings() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("SuperAdmin".parse::<Role>().is_err());
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_names() {
        assert_eq!(
            serde_json::to_string(&Role::Institution).unwrap(),
            "\"lembaga\""
        );
        let role: Role = serde_json::from_str("\"superadmin\"").unwrap();
        assert_eq!(role, Role::Superadmin);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "Non Formal".parse::<InstitutionCategory>().unwrap(),
            InstitutionCategory::NonFormal
        );
        assert_eq!(
            "SMP".parse::<InstitutionCategory>().unwrap(),
            InstitutionCategory::Smp
        );
        assert!("smp".parse::<InstitutionCategory>().is_err());
        assert!("TK".parse::<InstitutionCategory>().is_err());
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&InstitutionCategory::NonFormal).unwrap();
        assert_eq!(json, "\"Non Formal\"");
    }

    #[test]
    fn test_scope_required_for_institution() {
        assert!(Role::Institution.scope_for(None).is_err());
        assert_eq!(
            Role::Institution
                .scope_for(Some(InstitutionCategory::Sma))
                .unwrap(),
            Some(InstitutionCategory::Sma)
        );
    }

    #[test]
    fn test_scope_cleared_for_unscoped_roles() {
        assert_eq!(
            Role::Admin.scope_for(Some(InstitutionCategory::Sd)).unwrap(),
            None
        );
        assert_eq!(Role::Superadmin.scope_for(None).unwrap(), None);
    }

    #[test]
    fn test_new_account_normalizes_identifiers() {
        let account = NewAccount::new(
            "  Alice ",
            " Alice@Example.COM",
            "hash",
            " Alice A. ",
            Role::Admin,
            Some(InstitutionCategory::Smk),
        )
        .unwrap();

        assert_eq!(account.username, "alice");
        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.full_name, "Alice A.");
        assert_eq!(account.tenant_scope, None);
    }

    #[test]
    fn test_account_update_defaults_active() {
        let update = AccountUpdate::new("bob", "bob@example.com", "Bob", Role::Admin, None)
            .unwrap();
        assert!(update.is_active);
        assert!(update.password_hash.is_none());
        assert!(update.removes_superadmin());

        let update = AccountUpdate::new("root", "root@example.com", "Root", Role::Superadmin, None)
            .unwrap();
        assert!(!update.removes_superadmin());
        assert!(update.is_active(false).removes_superadmin());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let account = Account {
            id: "a1".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            full_name: "Admin".to_string(),
            role: Role::Admin,
            tenant_scope: None,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };

        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
