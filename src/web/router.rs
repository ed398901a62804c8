//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_registrant, create_user, delete_registrant, delete_user, get_registrant, get_user,
    health_check, list_registrants, list_users, login, register, store_health, update_registrant,
    update_user, verify, AppState,
};
use super::middleware::{create_cors_layer, inject_authenticator};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(login))
        .route("/verify", get(verify));

    let registrant_routes = Router::new()
        .route("/", get(list_registrants).post(create_registrant))
        .route(
            "/:id",
            get(get_registrant)
                .put(update_registrant)
                .delete(delete_registrant),
        );

    let user_routes = Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user));

    let admin_routes = Router::new()
        .nest("/registrants", registrant_routes)
        .nest("/users", user_routes);

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/admin", admin_routes)
        .route("/register", post(register))
        .route("/health/store", get(store_health));

    let authenticator = Arc::clone(&app_state.auth);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let authenticator = authenticator.clone();
                    inject_authenticator(authenticator, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Full application: API routes plus the liveness check.
pub fn create_app(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    create_router(app_state, cors_origins).merge(create_health_router())
}
