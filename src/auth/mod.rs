//! Authentication and authorization.
//!
//! Password hashing, session tokens, the access control policy and the
//! request pipeline that ties them to the credential store.

pub mod bootstrap;
mod error;
mod password;
pub mod pipeline;
pub mod policy;
mod token;

pub use bootstrap::{ensure_superadmin, BootstrapOutcome};
pub use error::AuthError;
pub use password::{
    validate_password, PasswordError, PasswordHasher, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use pipeline::{
    authorize, authorize_tenant, bearer_token, listing_scope, Authenticator, LoginOutcome,
    Principal,
};
pub use token::{Claims, IssuedToken, TokenService};
