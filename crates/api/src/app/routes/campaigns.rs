use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;

use fxcrm_auth::scope::{self, Action};
use fxcrm_clients::ClientId;
use fxcrm_core::OfficeId;
use fxcrm_marketing::{ActionId, Campaign, CampaignAction, CampaignId, NewAction, NewCampaign};

use crate::app::{dto, errors, AppServices};
use crate::authz;
use crate::context::RequestPrincipal;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_campaign).get(list_campaigns))
        .route("/:id", get(get_campaign))
        .route("/:id/status", patch(update_campaign_status))
        .route("/:id/target-clients", post(add_target_clients).delete(remove_target_clients))
        .route("/:id/actions", post(create_action).get(list_actions))
}

fn parse_campaign_id(id: &str) -> Result<CampaignId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid campaign id")
    })
}

/// Every target must be a client of `office_id`. "Absent" and "belongs to
/// another office" collapse into one outcome so cross-office existence never
/// leaks.
fn verify_targets(
    services: &AppServices,
    office_id: OfficeId,
    client_ids: &[ClientId],
) -> Result<(), axum::response::Response> {
    let all_in_office = client_ids.iter().all(|id| {
        services
            .clients
            .get(id)
            .map(|c| c.office_id == office_id)
            .unwrap_or(false)
    });
    if all_in_office {
        Ok(())
    } else {
        Err(errors::not_found(
            "one or more target clients not found in this exchange office",
        ))
    }
}

pub async fn create_campaign(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Json(body): Json<dto::CreateCampaignRequest>,
) -> axum::response::Response {
    let principal = principal.principal();
    let office_id = match authz::require_agent_office(principal) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(resp) = verify_targets(&services, office_id, &body.target_clients) {
        return resp;
    }

    let campaign = match Campaign::create(NewCampaign {
        id: CampaignId::new(),
        title: body.title,
        description: body.description.unwrap_or_default(),
        start_date: body.start_date,
        end_date: body.end_date,
        office_id,
        created_by: principal.user_id,
        target_clients: body.target_clients,
        created_at: Utc::now(),
    }) {
        Ok(campaign) => campaign,
        Err(e) => return errors::domain_error_to_response(e),
    };

    services.campaigns.upsert(campaign.id, campaign.clone());

    (StatusCode::CREATED, Json(dto::campaign_to_json(&campaign))).into_response()
}

pub async fn list_campaigns(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }

    let mut campaigns = services.campaigns.list_in_scope(&scope::office_filter(principal));
    campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let items = campaigns.iter().map(dto::campaign_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_campaign(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }
    let campaign_id = match parse_campaign_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(campaign) = services.campaigns.get(&campaign_id) else {
        return errors::not_found("campaign not found");
    };

    if let Err(e) = scope::authorize(principal, Some(campaign.office_id), Action::Read) {
        return errors::scope_error_to_response(e);
    }

    let mut actions = services.actions.find_where(|a| a.campaign_id == campaign_id);
    actions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut json = dto::campaign_to_json(&campaign);
    json["actions"] = actions.iter().map(dto::action_to_json).collect::<Vec<_>>().into();

    (StatusCode::OK, Json(json)).into_response()
}

pub async fn update_campaign_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCampaignStatusRequest>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }
    let campaign_id = match parse_campaign_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(mut campaign) = services.campaigns.get(&campaign_id) else {
        return errors::not_found("campaign not found");
    };

    if let Err(e) = scope::authorize(principal, Some(campaign.office_id), Action::Write) {
        return errors::scope_error_to_response(e);
    }

    campaign.set_status(body.status);
    services.campaigns.upsert(campaign.id, campaign.clone());

    (StatusCode::OK, Json(dto::campaign_to_json(&campaign))).into_response()
}

pub async fn add_target_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(body): Json<dto::ManageTargetClientsRequest>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }
    let campaign_id = match parse_campaign_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(mut campaign) = services.campaigns.get(&campaign_id) else {
        return errors::not_found("campaign not found");
    };

    if let Err(e) = scope::authorize(principal, Some(campaign.office_id), Action::Write) {
        return errors::scope_error_to_response(e);
    }
    if let Err(resp) = verify_targets(&services, campaign.office_id, &body.client_ids) {
        return resp;
    }

    campaign.add_targets(body.client_ids);
    services.campaigns.upsert(campaign.id, campaign.clone());

    (StatusCode::OK, Json(dto::campaign_to_json(&campaign))).into_response()
}

pub async fn remove_target_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(body): Json<dto::ManageTargetClientsRequest>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }
    let campaign_id = match parse_campaign_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(mut campaign) = services.campaigns.get(&campaign_id) else {
        return errors::not_found("campaign not found");
    };

    if let Err(e) = scope::authorize(principal, Some(campaign.office_id), Action::Write) {
        return errors::scope_error_to_response(e);
    }

    campaign.remove_targets(&body.client_ids);
    services.campaigns.upsert(campaign.id, campaign.clone());

    (StatusCode::OK, Json(dto::campaign_to_json(&campaign))).into_response()
}

/// Actions carry no office of their own; scope derives through the campaign.
pub async fn create_action(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    Json(body): Json<dto::CreateActionRequest>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }
    let campaign_id = match parse_campaign_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(campaign) = services.campaigns.get(&campaign_id) else {
        return errors::not_found("campaign not found");
    };

    if let Err(e) = scope::authorize(principal, Some(campaign.office_id), Action::Write) {
        return errors::scope_error_to_response(e);
    }

    let now = Utc::now();
    let mut action = match CampaignAction::create(NewAction {
        id: ActionId::new(),
        title: body.title,
        channel: body.channel,
        content: body.content,
        campaign_id,
        created_by: principal.user_id,
        created_at: now,
    }) {
        Ok(action) => action,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // Delivery itself is an external collaborator; accepting the action is
    // the handoff point.
    action.mark_sent(now);
    services.actions.upsert(action.id, action.clone());

    (StatusCode::CREATED, Json(dto::action_to_json(&action))).into_response()
}

pub async fn list_actions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let principal = principal.principal();
    if let Err(resp) = authz::require_agent(principal) {
        return resp;
    }
    let campaign_id = match parse_campaign_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(campaign) = services.campaigns.get(&campaign_id) else {
        return errors::not_found("campaign not found");
    };

    if let Err(e) = scope::authorize(principal, Some(campaign.office_id), Action::Read) {
        return errors::scope_error_to_response(e);
    }

    let mut actions = services.actions.find_where(|a| a.campaign_id == campaign_id);
    actions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let items = actions.iter().map(dto::action_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
