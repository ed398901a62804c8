//! Registrar - student registration service
//!
//! A multi-tenant registration backend for a school foundation: a public
//! registration form, JWT-authenticated administration and role-based access
//! control scoped to institution categories.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod registrant;
pub mod web;

pub use auth::{
    authorize, authorize_tenant, ensure_superadmin, validate_password, AuthError, Authenticator,
    BootstrapOutcome, Claims, PasswordError, PasswordHasher, Principal, TokenService,
};
pub use config::Config;
pub use db::{Account, CredentialStore, Database, InstitutionCategory, Role};
pub use error::{RegistrarError, Result};
pub use registrant::{Gender, Registrant, RegistrantData, RegistrantRepository};
pub use web::{AppState, WebServer};
