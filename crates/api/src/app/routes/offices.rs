use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;

use fxcrm_auth::scope::{self, Action};
use fxcrm_core::OfficeId;
use fxcrm_offices::{ExchangeOffice, NewOffice, OfficeUpdate};

use crate::app::{dto, errors, AppServices};
use crate::authz;
use crate::context::RequestPrincipal;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_office).get(list_offices))
        .route("/my-office", get(my_office))
        .route("/:id", get(get_office).put(update_office).delete(delete_office))
        .route("/:id/status", patch(update_office_status))
}

pub async fn create_office(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Json(body): Json<dto::CreateOfficeRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    let email = body.email.trim().to_lowercase();
    if !services.offices.find_where(|o| o.email == email).is_empty() {
        return errors::json_error(
            StatusCode::CONFLICT,
            "conflict",
            "an exchange office with this email already exists",
        );
    }

    let office = match ExchangeOffice::create(NewOffice {
        id: OfficeId::new(),
        name: body.name,
        address: body.address.unwrap_or_default(),
        email: body.email,
        phone: body.phone.unwrap_or_default(),
        owner: body.owner,
        created_at: Utc::now(),
    }) {
        Ok(office) => office,
        Err(e) => return errors::domain_error_to_response(e),
    };

    services.offices.upsert(office.id, office.clone());

    (StatusCode::CREATED, Json(dto::office_to_json(&office))).into_response()
}

pub async fn list_offices(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Query(query): Query<dto::StatusFilterQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    let mut offices = services
        .offices
        .find_where(|o| query.status.map(|s| o.status == s).unwrap_or(true));
    offices.sort_by(|a, b| a.name.cmp(&b.name));

    let items = offices.iter().map(dto::office_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn my_office(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }

    let Some(office_id) = principal.office_id else {
        return errors::not_found("no exchange office assigned");
    };
    let Some(office) = services.offices.get(&office_id) else {
        return errors::not_found("exchange office not found");
    };

    if let Err(e) = scope::authorize(principal, Some(office.id), Action::Read) {
        return errors::scope_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::office_to_json(&office))).into_response()
}

pub async fn get_office(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    let office_id: OfficeId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid office id"),
    };

    match services.offices.get(&office_id) {
        Some(office) => (StatusCode::OK, Json(dto::office_to_json(&office))).into_response(),
        None => errors::not_found("exchange office not found"),
    }
}

pub async fn update_office(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(update): Json<OfficeUpdate>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    let office_id: OfficeId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid office id"),
    };
    let Some(mut office) = services.offices.get(&office_id) else {
        return errors::not_found("exchange office not found");
    };

    if let Some(email) = update.email.as_deref() {
        let email = email.trim().to_lowercase();
        let taken = !services
            .offices
            .find_where(|o| o.id != office_id && o.email == email)
            .is_empty();
        if taken {
            return errors::json_error(
                StatusCode::CONFLICT,
                "conflict",
                "an exchange office with this email already exists",
            );
        }
    }

    if let Err(e) = office.apply_update(update) {
        return errors::domain_error_to_response(e);
    }
    services.offices.upsert(office.id, office.clone());

    (StatusCode::OK, Json(dto::office_to_json(&office))).into_response()
}

pub async fn update_office_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStatusRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    let office_id: OfficeId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid office id"),
    };
    let Some(mut office) = services.offices.get(&office_id) else {
        return errors::not_found("exchange office not found");
    };

    office.set_status(body.status);
    services.offices.upsert(office.id, office.clone());

    (StatusCode::OK, Json(dto::office_to_json(&office))).into_response()
}

pub async fn delete_office(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    let office_id: OfficeId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid office id"),
    };
    if !services.offices.contains(&office_id) {
        return errors::not_found("exchange office not found");
    }

    let has_users = !services
        .users
        .list_in_scope(&fxcrm_auth::OfficeFilter::Office(office_id))
        .is_empty();
    let has_clients = services.clients.count_where(|c| c.office_id == office_id) > 0;
    if has_users || has_clients {
        return errors::json_error(
            StatusCode::CONFLICT,
            "conflict",
            "cannot delete an exchange office that still has users or clients",
        );
    }

    services.offices.remove(&office_id);

    (StatusCode::OK, Json(serde_json::json!({ "id": office_id, "deleted": true }))).into_response()
}
