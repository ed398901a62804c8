//! First-run superadmin bootstrap.

use tracing::{info, warn};

use super::password::{validate_password, PasswordHasher};
use crate::config::BootstrapConfig;
use crate::db::{Account, CredentialStore, NewAccount, Role};
use crate::{RegistrarError, Result};

/// What `ensure_superadmin` did.
#[derive(Debug)]
pub enum BootstrapOutcome {
    /// A superadmin was created from the configuration.
    Created(Account),
    /// An active superadmin already exists; nothing changed.
    AlreadyPresent,
    /// No active superadmin and no bootstrap password configured.
    Skipped,
}

/// Create the configured superadmin when no active superadmin exists.
pub async fn ensure_superadmin(
    store: &dyn CredentialStore,
    hasher: &PasswordHasher,
    config: &BootstrapConfig,
) -> Result<BootstrapOutcome> {
    if store.count_active_by_role(Role::Superadmin).await? > 0 {
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let Some(password) = config.password.as_deref() else {
        warn!(
            "No active superadmin and no bootstrap password configured; \
             set REGISTRAR_BOOTSTRAP_PASSWORD to create one"
        );
        return Ok(BootstrapOutcome::Skipped);
    };

    validate_password(password)
        .map_err(|e| RegistrarError::Config(format!("bootstrap password: {e}")))?;
    let hash = hasher
        .hash(password)
        .map_err(|e| RegistrarError::Config(format!("bootstrap password: {e}")))?;

    let new = NewAccount::new(
        &config.username,
        &config.email,
        hash,
        &config.full_name,
        Role::Superadmin,
        None,
    )?;

    let account = store.insert(&new).await.map_err(|e| match e {
        RegistrarError::Conflict(_) => RegistrarError::Config(format!(
            "bootstrap account '{}' clashes with an existing username or email",
            new.username
        )),
        other => other,
    })?;

    info!(account_id = %account.id, username = %account.username, "Bootstrap superadmin created");
    Ok(BootstrapOutcome::Created(account))
}
