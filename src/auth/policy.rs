//! Access control policy.
//!
//! Pure decision functions over accounts, roles and institution categories.
//! They never touch the store; the pipeline and handlers combine them with
//! live data.

use crate::db::{Account, InstitutionCategory, Role};

/// Check whether `role` is among `allowed`.
///
/// An empty list admits every role.
///
/// # Examples
///
/// ```
/// use registrar::auth::policy::is_role_allowed;
/// use registrar::db::Role;
///
/// assert!(is_role_allowed(Role::Admin, &[]));
/// assert!(is_role_allowed(Role::Admin, &[Role::Superadmin, Role::Admin]));
/// assert!(!is_role_allowed(Role::Institution, &[Role::Superadmin]));
/// ```
pub fn is_role_allowed(role: Role, allowed: &[Role]) -> bool {
    allowed.is_empty() || allowed.contains(&role)
}

/// Check whether `account` may touch data of `category`.
///
/// Superadmins and admins see every category; institution accounts only
/// their own.
pub fn can_access_tenant(account: &Account, category: InstitutionCategory) -> bool {
    match account.role {
        Role::Superadmin | Role::Admin => true,
        Role::Institution => account.tenant_scope == Some(category),
    }
}

/// Check whether `target` may be deactivated given the current number of
/// active superadmins.
///
/// Only refuses removing a superadmin when at most one is active. The store
/// repeats this check atomically when it performs the write.
pub fn can_delete_account(target: &Account, active_superadmin_count: i64) -> bool {
    !(target.is_superadmin() && active_superadmin_count <= 1)
}

/// Category filter actually applied to a listing requested by `account`.
///
/// Institution accounts are pinned to their own scope whatever they ask
/// for; other roles get the requested filter.
pub fn scoped_category(
    account: &Account,
    requested: Option<InstitutionCategory>,
) -> Option<InstitutionCategory> {
    match account.role {
        Role::Superadmin | Role::Admin => requested,
        Role::Institution => account.tenant_scope,
    }
}
