use std::sync::Arc;

use axum::{extract::State, http::StatusCode, middleware::Next, response::Response};

use fxcrm_auth::{CredentialStore, PrincipalResolver};

use crate::context::RequestPrincipal;

#[derive(Clone)]
pub struct AuthState {
    pub resolver: Arc<PrincipalResolver<Arc<dyn CredentialStore>>>,
}

/// Resolve the request's principal or answer 401.
///
/// Resolution re-reads the credential store, so role changes and
/// deactivations take effect on the very next request of a live token.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let authorization = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let principal = state
        .resolver
        .resolve(authorization)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(RequestPrincipal::new(principal));

    Ok(next.run(req).await)
}
