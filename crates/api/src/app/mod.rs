//! HTTP API application wiring (axum router + store wiring).
//!
//! Layout:
//! - `services.rs`: store wiring and startup bootstrap
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use fxcrm_auth::{Authenticator, CredentialStore, PrincipalResolver, TokenCodec};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppAuthenticator, AppServices};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String) -> Router {
    let services = Arc::new(services::build_services());
    services::bootstrap_admin_from_env(&services);
    build_app_with(services, jwt_secret)
}

/// Build the router over externally constructed services (tests seed these).
pub fn build_app_with(services: Arc<AppServices>, jwt_secret: String) -> Router {
    let codec = TokenCodec::new(jwt_secret.as_bytes());

    let store: Arc<dyn CredentialStore> = services.users.clone();
    let auth_state = middleware::AuthState {
        resolver: Arc::new(PrincipalResolver::new(codec.clone(), store)),
    };
    let authenticator: Arc<AppAuthenticator> =
        Arc::new(Authenticator::new(codec, services.users.clone()));

    // Protected routes: every request passes principal resolution first.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .merge(protected)
        .layer(Extension(services))
        .layer(Extension(authenticator))
        .layer(ServiceBuilder::new())
}
