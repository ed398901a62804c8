//! HTTP API.
//!
//! JSON over axum: the public registration form, login and token
//! verification, registrant administration and account management.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_app, create_router};
pub use server::WebServer;
