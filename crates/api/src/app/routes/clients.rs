use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use fxcrm_auth::scope::{self, Action, OfficeFilter};
use fxcrm_clients::{Client, ClientId, ClientUpdate, NewClient, SegmentEntry};
use fxcrm_core::OfficeId;

use crate::app::{dto, errors, AppServices};
use crate::authz;
use crate::context::RequestPrincipal;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_client).get(list_clients))
        .route("/my-office", get(my_office_clients))
        .route("/by-office/:office_id", get(clients_by_office))
        .route("/:id", get(get_client).put(update_client).delete(delete_client))
        .route("/:id/segment-history", get(segment_history))
        .route("/:id/recommendations", get(recommendations))
}

fn parse_client_id(id: &str) -> Result<ClientId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid client id")
    })
}

/// Per-office uniqueness of identity documents.
fn document_taken(
    services: &AppServices,
    office_id: OfficeId,
    passport: Option<&str>,
    national_id: Option<&str>,
    excluding: Option<ClientId>,
) -> Option<axum::response::Response> {
    if let Some(passport) = passport {
        let dup = services.clients.count_where(|c| {
            Some(c.id) != excluding
                && c.office_id == office_id
                && c.passport.as_deref() == Some(passport)
        }) > 0;
        if dup {
            return Some(errors::json_error(
                StatusCode::CONFLICT,
                "conflict",
                "a client with this passport number already exists in this exchange office",
            ));
        }
    }
    if let Some(national_id) = national_id {
        let dup = services.clients.count_where(|c| {
            Some(c.id) != excluding
                && c.office_id == office_id
                && c.national_id.as_deref() == Some(national_id)
        }) > 0;
        if dup {
            return Some(errors::json_error(
                StatusCode::CONFLICT,
                "conflict",
                "a client with this national id already exists in this exchange office",
            ));
        }
    }
    None
}

pub async fn create_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Json(body): Json<dto::CreateClientRequest>,
) -> axum::response::Response {
    let office_id = match authz::require_agent_office(principal.principal()) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Some(resp) = document_taken(
        &services,
        office_id,
        body.passport.as_deref(),
        body.national_id.as_deref(),
        None,
    ) {
        return resp;
    }

    let now = Utc::now();
    let client = match Client::create(NewClient {
        id: ClientId::new(),
        first_name: body.first_name,
        last_name: body.last_name,
        birth_date: body.birth_date,
        email: body.email,
        phone: body.phone,
        whatsapp: body.whatsapp,
        national_id: body.national_id,
        passport: body.passport,
        nationality: body.nationality,
        residence: body.residence,
        gender: body.gender,
        acquisition_source: body.acquisition_source,
        segment: body.segment,
        office_id,
        created_at: now,
    }) {
        Ok(client) => client,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Some(segment) = client.segment.clone() {
        let entry = SegmentEntry::record(client.id, segment, now);
        services.segment_history.upsert(entry.id, entry);
    }
    services.clients.upsert(client.id, client.clone());

    (StatusCode::CREATED, Json(dto::client_to_json(&client))).into_response()
}

/// Admin listing over all offices (optional `office_id` narrows it).
pub async fn list_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Query(query): Query<dto::ClientListQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    let filter = match query.office_id {
        Some(office_id) => OfficeFilter::Office(office_id),
        None => OfficeFilter::All,
    };
    filtered_page(&services, filter, query)
}

/// Agent listing; the office constraint is the scope filter, pushed into the
/// store query.
pub async fn my_office_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Query(query): Query<dto::ClientListQuery>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }

    filtered_page(&services, scope::office_filter(principal), query)
}

/// Admin listing for a *claimed* office: the role check precedes the
/// existence lookup, so non-admins learn nothing about office ids.
pub async fn clients_by_office(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(office_id): Path<String>,
    Query(query): Query<dto::ClientListQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }

    let office_id: OfficeId = match office_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid office id"),
    };
    if !services.offices.contains(&office_id) {
        return errors::not_found("exchange office not found");
    }

    filtered_page(&services, OfficeFilter::Office(office_id), query)
}

fn filtered_page(
    services: &AppServices,
    filter: OfficeFilter,
    query: dto::ClientListQuery,
) -> axum::response::Response {
    let mut clients = services.clients.list_in_scope(&filter);

    clients.retain(|c| query.status.map(|s| c.status == s).unwrap_or(true));
    clients.retain(|c| query.gender.map(|g| c.gender == g).unwrap_or(true));
    clients.retain(|c| {
        query
            .acquisition_source
            .map(|s| c.acquisition_source == s)
            .unwrap_or(true)
    });
    if let Some(nationality) = query.nationality.as_deref() {
        clients.retain(|c| c.nationality.eq_ignore_ascii_case(nationality));
    }
    if let Some(segment) = query.segment.as_deref() {
        clients.retain(|c| c.segment.as_deref() == Some(segment));
    }
    if let Some(search) = query.search.as_deref() {
        let needle = search.to_lowercase();
        clients.retain(|c| {
            c.first_name.to_lowercase().contains(&needle)
                || c.last_name.to_lowercase().contains(&needle)
                || c.email.as_deref().map(|e| e.contains(&needle)).unwrap_or(false)
                || c.phone.as_deref().map(|p| p.contains(&needle)).unwrap_or(false)
        });
    }

    clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = clients.len();
    let limit = query.limit.unwrap_or(20).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let items = clients
        .iter()
        .skip((page - 1) * limit)
        .take(limit)
        .map(dto::client_to_json)
        .collect::<Vec<_>>();

    (StatusCode::OK, Json(dto::paged_json(items, total, page, limit))).into_response()
}

pub async fn get_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let client_id = match parse_client_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(client) = services.clients.get(&client_id) else {
        return errors::not_found("client not found");
    };

    if let Err(e) = scope::authorize(principal.principal(), Some(client.office_id), Action::Read) {
        return errors::scope_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::client_to_json(&client))).into_response()
}

pub async fn update_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(update): Json<ClientUpdate>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }
    let client_id = match parse_client_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(mut client) = services.clients.get(&client_id) else {
        return errors::not_found("client not found");
    };

    if let Err(e) = scope::authorize(principal, Some(client.office_id), Action::Write) {
        return errors::scope_error_to_response(e);
    }

    if let Some(resp) = document_taken(
        &services,
        client.office_id,
        update.passport.as_deref(),
        update.national_id.as_deref(),
        Some(client.id),
    ) {
        return resp;
    }

    let changed_segment = match client.apply_update(update) {
        Ok(changed) => changed,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Some(segment) = changed_segment {
        let entry = SegmentEntry::record(client.id, segment, Utc::now());
        services.segment_history.upsert(entry.id, entry);
    }
    services.clients.upsert(client.id, client.clone());

    (StatusCode::OK, Json(dto::client_to_json(&client))).into_response()
}

/// Soft delete (status flip); allowed for admins anywhere and agents within
/// their office.
pub async fn delete_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let client_id = match parse_client_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(mut client) = services.clients.get(&client_id) else {
        return errors::not_found("client not found");
    };

    if let Err(e) = scope::authorize(principal.principal(), Some(client.office_id), Action::Write) {
        return errors::scope_error_to_response(e);
    }

    client.deactivate();
    services.clients.upsert(client.id, client);

    (StatusCode::OK, Json(serde_json::json!({ "id": client_id, "deleted": true }))).into_response()
}

/// Segment history has no office of its own; scope derives through the client.
pub async fn segment_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let client_id = match parse_client_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(client) = services.clients.get(&client_id) else {
        return errors::not_found("client not found");
    };

    if let Err(e) = scope::authorize(principal.principal(), Some(client.office_id), Action::Read) {
        return errors::scope_error_to_response(e);
    }

    let mut entries = services.segment_history.find_where(|e| e.client_id == client_id);
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let items = entries.iter().map(dto::segment_entry_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// Recommendations are written by the analytics pipeline; scope derives
/// through the client exactly as for segment history.
pub async fn recommendations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let client_id = match parse_client_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(client) = services.clients.get(&client_id) else {
        return errors::not_found("client not found");
    };

    if let Err(e) = scope::authorize(principal.principal(), Some(client.office_id), Action::Read) {
        return errors::scope_error_to_response(e);
    }

    let mut recs = services.recommendations.find_where(|r| r.client_id == client_id);
    recs.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));

    let items = recs.iter().map(dto::recommendation_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
