use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::Utc;

use fxcrm_auth::{
    hash_password, normalize_email, scope, verify_password, CredentialStore, NewUser, Role, User,
};
use fxcrm_core::UserId;

use crate::app::{dto, errors, AppServices};
use crate::authz;
use crate::context::RequestPrincipal;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/agents/by-office", get(agents_by_office))
        .route("/change-password", put(change_password))
        .route("/:id", put(update_user))
        .route("/:id/status", patch(update_user_status))
        .route("/:id/reset-password", put(reset_password))
}

fn parse_user_id(id: &str) -> Result<UserId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id")
    })
}

fn user_json(services: &AppServices, user: &User) -> serde_json::Value {
    let office = user.office_id.and_then(|id| services.office_summary(id));
    dto::user_to_json(&user.profile(), office)
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    if body.password.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "password is required");
    }

    if services.users.email_taken(&normalize_email(&body.email), None) {
        return errors::json_error(
            StatusCode::CONFLICT,
            "conflict",
            "a user with this email already exists",
        );
    }

    // The office reference must resolve before the record is created: every
    // agent carries a valid owning office from its first moment.
    if body.role == Role::Agent {
        match body.office_id {
            None => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    "an exchange office is required for agents",
                );
            }
            Some(office_id) if !services.offices.contains(&office_id) => {
                return errors::not_found("exchange office not found");
            }
            Some(_) => {}
        }
    }

    let password_hash = match hash_password(&body.password) {
        Ok(hash) => hash,
        Err(_) => {
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    };

    let user = match User::create(NewUser {
        id: UserId::new(),
        email: body.email,
        password_hash,
        first_name: body.first_name,
        last_name: body.last_name,
        phone: body.phone.unwrap_or_default(),
        role: body.role,
        office_id: body.office_id,
        created_at: Utc::now(),
    }) {
        Ok(user) => user,
        Err(e) => return errors::domain_error_to_response(e),
    };

    services.users.insert(user.clone());

    (StatusCode::CREATED, Json(user_json(&services, &user))).into_response()
}

/// Admin: all users (+ role/status filters). Agent: own office only; the
/// office constraint is the scope filter, applied at the store query.
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Query(query): Query<dto::UserListQuery>,
) -> axum::response::Response {
    let filter = scope::office_filter(principal.principal());

    let mut users = services.users.list_in_scope(&filter);
    users.retain(|u| query.role.map(|r| u.role == r).unwrap_or(true));
    users.retain(|u| query.status.map(|s| u.status == s).unwrap_or(true));
    users.sort_by(|a, b| a.email.cmp(&b.email));

    let items = users.iter().map(|u| user_json(&services, u)).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn agents_by_office(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    let mut offices = services.offices.find_where(|_| true);
    offices.sort_by(|a, b| a.name.cmp(&b.name));

    let groups = offices
        .iter()
        .map(|office| {
            let mut agents = services
                .users
                .list_in_scope(&fxcrm_auth::OfficeFilter::Office(office.id));
            agents.retain(|u| u.role == Role::Agent);
            agents.sort_by(|a, b| a.email.cmp(&b.email));

            serde_json::json!({
                "office": dto::office_to_json(office),
                "agents": agents.iter().map(|u| user_json(&services, u)).collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();

    (StatusCode::OK, Json(serde_json::json!({ "items": groups }))).into_response()
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }
    let user_id = match parse_user_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(mut user) = services.users.find_by_id(user_id) else {
        return errors::not_found("user not found");
    };

    if let Some(email) = body.email.as_deref() {
        if services.users.email_taken(&normalize_email(email), Some(user_id)) {
            return errors::json_error(
                StatusCode::CONFLICT,
                "conflict",
                "a user with this email already exists",
            );
        }
    }

    if let Err(e) = user.update_identity(
        body.email.as_deref(),
        body.first_name.as_deref(),
        body.last_name.as_deref(),
        body.phone.as_deref(),
    ) {
        return errors::domain_error_to_response(e);
    }

    services.users.insert(user.clone());

    (StatusCode::OK, Json(user_json(&services, &user))).into_response()
}

/// Deactivation takes effect on the target's very next request: the resolver
/// re-reads this record even for still-unexpired tokens.
pub async fn update_user_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStatusRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }
    let user_id = match parse_user_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(mut user) = services.users.find_by_id(user_id) else {
        return errors::not_found("user not found");
    };

    user.set_status(body.status);
    services.users.insert(user.clone());

    (StatusCode::OK, Json(user_json(&services, &user))).into_response()
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Json(body): Json<dto::ChangePasswordRequest>,
) -> axum::response::Response {
    if body.new_password.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "new password is required");
    }

    let Some(mut user) = services.users.find_by_id(principal.principal().user_id) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "unauthenticated");
    };

    if !verify_password(&body.current_password, &user.password_hash) {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "current password is incorrect",
        );
    }

    let hash = match hash_password(&body.new_password) {
        Ok(hash) => hash,
        Err(_) => {
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    };
    user.set_password_hash(hash);
    services.users.insert(user);

    (StatusCode::OK, Json(serde_json::json!({ "message": "password changed" }))).into_response()
}

pub async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(body): Json<dto::ResetPasswordRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }
    if body.new_password.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "new password is required");
    }
    let user_id = match parse_user_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(mut user) = services.users.find_by_id(user_id) else {
        return errors::not_found("user not found");
    };

    let hash = match hash_password(&body.new_password) {
        Ok(hash) => hash,
        Err(_) => {
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    };
    user.set_password_hash(hash);
    services.users.insert(user);

    (StatusCode::OK, Json(serde_json::json!({ "message": "password reset" }))).into_response()
}
