use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::app::{dto, errors, AppAuthenticator, AppServices};
use crate::context::RequestPrincipal;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(authenticator): Extension<Arc<AppAuthenticator>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "email and password are required",
        );
    }

    let session = match authenticator.authenticate(&body.email, &body.password, Utc::now()) {
        Ok(session) => session,
        Err(e) => return errors::login_error_to_response(e),
    };

    let office = session.user.office_id.and_then(|id| services.office_summary(id));

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": session.token,
            "expires_in": session.expires_in,
            "user": dto::user_to_json(&session.user, office),
        })),
    )
        .into_response()
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    use fxcrm_auth::CredentialStore;

    // The middleware resolved this id a moment ago; a miss here means the
    // record vanished mid-request.
    let Some(user) = services.users.find_by_id(principal.principal().user_id) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "unauthenticated");
    };

    let office = user.office_id.and_then(|id| services.office_summary(id));

    (StatusCode::OK, Json(dto::user_to_json(&user.profile(), office))).into_response()
}
