use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use fxcrm_auth::scope::{self, Action, OfficeFilter};
use fxcrm_core::OfficeId;
use fxcrm_transactions::{NewTransaction, Transaction, TransactionId, TransactionUpdate};

use crate::app::{dto, errors, AppServices};
use crate::authz;
use crate::context::RequestPrincipal;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_transaction))
        .route("/my-office", get(my_office_transactions))
        .route("/by-office/:office_id", get(transactions_by_office))
        .route("/by-client/:client_id", get(transactions_by_client))
        .route("/:id", get(get_transaction).put(update_transaction).delete(delete_transaction))
}

fn parse_transaction_id(id: &str) -> Result<TransactionId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid transaction id")
    })
}

fn list_response(mut transactions: Vec<Transaction>) -> axum::response::Response {
    transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    let items = transactions.iter().map(dto::transaction_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn create_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Json(body): Json<dto::CreateTransactionRequest>,
) -> axum::response::Response {
    let principal = principal.principal();
    let office_id = match authz::require_agent_office(principal) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let Some(client) = services.clients.get(&body.client_id) else {
        return errors::not_found("client not found");
    };
    if let Err(e) = scope::authorize(principal, Some(client.office_id), Action::Write) {
        return errors::scope_error_to_response(e);
    }

    let transaction = match Transaction::create(NewTransaction {
        id: TransactionId::new(),
        amount: body.amount,
        source_currency: body.source_currency,
        target_currency: body.target_currency,
        exchange_rate: body.exchange_rate,
        transaction_date: body.transaction_date,
        client_id: client.id,
        office_id,
        created_at: Utc::now(),
    }) {
        Ok(tx) => tx,
        Err(e) => return errors::domain_error_to_response(e),
    };

    services.transactions.upsert(transaction.id, transaction.clone());

    (StatusCode::CREATED, Json(dto::transaction_to_json(&transaction))).into_response()
}

pub async fn my_office_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }

    list_response(services.transactions.list_in_scope(&scope::office_filter(principal)))
}

/// Admin listing for a *claimed* office; the role check precedes existence.
pub async fn transactions_by_office(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(office_id): Path<String>,
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

    list_response(services.transactions.list_in_scope(&OfficeFilter::Office(office_id)))
}

/// Agents reach this only for clients of their own office; the scope check
/// runs against the client before any transaction is revealed.
pub async fn transactions_by_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(client_id): Path<String>,
) -> axum::response::Response {
    let client_id: fxcrm_clients::ClientId = match client_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid client id"),
    };
    let Some(client) = services.clients.get(&client_id) else {
        return errors::not_found("client not found");
    };
    if let Err(e) = scope::authorize(principal.principal(), Some(client.office_id), Action::Read) {
        return errors::scope_error_to_response(e);
    }

    list_response(services.transactions.find_where(|t| t.client_id == client_id))
}

pub async fn get_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let transaction_id = match parse_transaction_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(transaction) = services.transactions.get(&transaction_id) else {
        return errors::not_found("transaction not found");
    };

    if let Err(e) = scope::authorize(principal.principal(), Some(transaction.office_id), Action::Read) {
        return errors::scope_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::transaction_to_json(&transaction))).into_response()
}

pub async fn update_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(update): Json<TransactionUpdate>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }
    let transaction_id = match parse_transaction_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(mut transaction) = services.transactions.get(&transaction_id) else {
        return errors::not_found("transaction not found");
    };

    if let Err(e) = transaction.apply_update(update) {
        return errors::domain_error_to_response(e);
    }
    services.transactions.upsert(transaction.id, transaction.clone());

    (StatusCode::OK, Json(dto::transaction_to_json(&transaction))).into_response()
}

pub async fn delete_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal.principal()) {
        return resp;
    }
    let transaction_id = match parse_transaction_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.transactions.remove(&transaction_id) {
        Some(_) => {
            (StatusCode::OK, Json(serde_json::json!({ "id": transaction_id, "deleted": true })))
                .into_response()
        }
        None => errors::not_found("transaction not found"),
    }
}
