use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use fxcrm_auth::scope::{self, Action};
use fxcrm_marketing::{NewQuickMessage, QuickMessage, QuickMessageId};

use crate::app::{dto, errors, AppServices};
use crate::authz;
use crate::context::RequestPrincipal;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_quick_message).get(list_quick_messages))
        .route("/:id", get(get_quick_message))
}

pub async fn create_quick_message(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Json(body): Json<dto::CreateQuickMessageRequest>,
) -> axum::response::Response {
    let principal = principal.principal();
    let office_id = match authz::require_agent_office(principal) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // Same collapsed outcome as campaign targets: absent and foreign-office
    // clients are indistinguishable.
    let all_in_office = body.target_clients.iter().all(|id| {
        services
            .clients
            .get(id)
            .map(|c| c.office_id == office_id)
            .unwrap_or(false)
    });
    if !all_in_office {
        return errors::not_found("one or more target clients not found in this exchange office");
    }

    let now = Utc::now();
    let mut message = match QuickMessage::create(NewQuickMessage {
        id: QuickMessageId::new(),
        title: body.title,
        channel: body.channel,
        content: body.content,
        office_id,
        created_by: principal.user_id,
        target_clients: body.target_clients,
        created_at: now,
    }) {
        Ok(message) => message,
        Err(e) => return errors::domain_error_to_response(e),
    };

    message.mark_sent(now);
    services.quick_messages.upsert(message.id, message.clone());

    (StatusCode::CREATED, Json(dto::quick_message_to_json(&message))).into_response()
}

pub async fn list_quick_messages(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }

    let mut messages: Vec<QuickMessage> =
        services.quick_messages.list_in_scope(&scope::office_filter(principal));
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let items = messages.iter().map(dto::quick_message_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_quick_message(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }
    let message_id: QuickMessageId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid message id")
        }
    };
    let Some(message) = services.quick_messages.get(&message_id) else {
        return errors::not_found("quick message not found");
    };

    if let Err(e) = scope::authorize(principal, Some(message.office_id), Action::Read) {
        return errors::scope_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::quick_message_to_json(&message))).into_response()
}
