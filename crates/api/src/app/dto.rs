use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use fxcrm_auth::UserProfile;
use fxcrm_clients::{
    AcquisitionSource, Client, ClientId, Gender, Recommendation, SegmentEntry,
};
use fxcrm_core::{OfficeId, Status};
use fxcrm_marketing::{Campaign, CampaignAction, CampaignStatus, Channel, QuickMessage};
use fxcrm_offices::{ExchangeOffice, OfficeSummary};
use fxcrm_transactions::{Currency, Transaction};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOfficeRequest {
    pub name: String,
    pub address: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub owner: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Status,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: fxcrm_auth::Role,
    pub office_id: Option<OfficeId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub national_id: Option<String>,
    pub passport: Option<String>,
    pub nationality: String,
    pub residence: Option<String>,
    pub gender: Gender,
    pub acquisition_source: AcquisitionSource,
    pub segment: Option<String>,
}

/// Listing filters + paging shared by the client list endpoints. `office_id`
/// is honored only on the admin listing; agents are constrained by scope.
#[derive(Debug, Deserialize, Default)]
pub struct ClientListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub status: Option<Status>,
    pub search: Option<String>,
    pub nationality: Option<String>,
    pub gender: Option<Gender>,
    pub acquisition_source: Option<AcquisitionSource>,
    pub segment: Option<String>,
    pub office_id: Option<OfficeId>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub client_id: ClientId,
    pub amount: f64,
    pub source_currency: Currency,
    pub target_currency: Currency,
    pub exchange_rate: f64,
    pub transaction_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub target_clients: Vec<ClientId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCampaignStatusRequest {
    pub status: CampaignStatus,
}

#[derive(Debug, Deserialize)]
pub struct ManageTargetClientsRequest {
    pub client_ids: Vec<ClientId>,
}

#[derive(Debug, Deserialize)]
pub struct CreateActionRequest {
    pub title: String,
    pub channel: Channel,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuickMessageRequest {
    pub title: String,
    pub channel: Channel,
    pub content: String,
    pub target_clients: Vec<ClientId>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UserListQuery {
    pub role: Option<fxcrm_auth::Role>,
    pub status: Option<Status>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StatusFilterQuery {
    pub status: Option<Status>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn user_to_json(profile: &UserProfile, office: Option<OfficeSummary>) -> serde_json::Value {
    serde_json::json!({
        "id": profile.id,
        "email": profile.email,
        "first_name": profile.first_name,
        "last_name": profile.last_name,
        "phone": profile.phone,
        "role": profile.role,
        "status": profile.status,
        "office": office,
        "created_at": profile.created_at.to_rfc3339(),
    })
}

pub fn office_to_json(office: &ExchangeOffice) -> serde_json::Value {
    serde_json::json!({
        "id": office.id,
        "name": office.name,
        "address": office.address,
        "email": office.email,
        "phone": office.phone,
        "owner": office.owner,
        "status": office.status,
        "created_at": office.created_at.to_rfc3339(),
    })
}

pub fn client_to_json(client: &Client) -> serde_json::Value {
    serde_json::json!({
        "id": client.id,
        "first_name": client.first_name,
        "last_name": client.last_name,
        "birth_date": client.birth_date,
        "email": client.email,
        "phone": client.phone,
        "whatsapp": client.whatsapp,
        "national_id": client.national_id,
        "passport": client.passport,
        "nationality": client.nationality,
        "residence": client.residence,
        "gender": client.gender,
        "acquisition_source": client.acquisition_source,
        "segment": client.segment,
        "status": client.status,
        "office_id": client.office_id,
        "created_at": client.created_at.to_rfc3339(),
    })
}

pub fn transaction_to_json(tx: &Transaction) -> serde_json::Value {
    serde_json::json!({
        "id": tx.id,
        "amount": tx.amount,
        "source_currency": tx.source_currency,
        "target_currency": tx.target_currency,
        "exchange_rate": tx.exchange_rate,
        "converted_amount": tx.converted_amount(),
        "transaction_date": tx.transaction_date.to_rfc3339(),
        "client_id": tx.client_id,
        "office_id": tx.office_id,
        "created_at": tx.created_at.to_rfc3339(),
    })
}

pub fn campaign_to_json(campaign: &Campaign) -> serde_json::Value {
    serde_json::json!({
        "id": campaign.id,
        "title": campaign.title,
        "description": campaign.description,
        "status": campaign.status,
        "start_date": campaign.start_date.to_rfc3339(),
        "end_date": campaign.end_date.to_rfc3339(),
        "office_id": campaign.office_id,
        "created_by": campaign.created_by,
        "target_clients": campaign.target_clients,
        "created_at": campaign.created_at.to_rfc3339(),
    })
}

pub fn action_to_json(action: &CampaignAction) -> serde_json::Value {
    serde_json::json!({
        "id": action.id,
        "title": action.title,
        "channel": action.channel,
        "content": action.content,
        "sent_at": action.sent_at.map(|d| d.to_rfc3339()),
        "campaign_id": action.campaign_id,
        "created_by": action.created_by,
        "created_at": action.created_at.to_rfc3339(),
    })
}

pub fn quick_message_to_json(message: &QuickMessage) -> serde_json::Value {
    serde_json::json!({
        "id": message.id,
        "title": message.title,
        "channel": message.channel,
        "content": message.content,
        "sent_at": message.sent_at.map(|d| d.to_rfc3339()),
        "office_id": message.office_id,
        "created_by": message.created_by,
        "target_clients": message.target_clients,
        "created_at": message.created_at.to_rfc3339(),
    })
}

pub fn segment_entry_to_json(entry: &SegmentEntry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id,
        "client_id": entry.client_id,
        "segment": entry.segment,
        "created_at": entry.created_at.to_rfc3339(),
    })
}

pub fn recommendation_to_json(rec: &Recommendation) -> serde_json::Value {
    serde_json::json!({
        "id": rec.id,
        "client_id": rec.client_id,
        "recommendation_type": rec.recommendation_type,
        "description": rec.description,
        "status": rec.status,
        "generated_at": rec.generated_at.to_rfc3339(),
    })
}

/// Page envelope for client listings.
pub fn paged_json(
    items: Vec<serde_json::Value>,
    total: usize,
    page: usize,
    limit: usize,
) -> serde_json::Value {
    let total_pages = total.div_ceil(limit.max(1));
    serde_json::json!({
        "items": items,
        "total": total,
        "page": page,
        "total_pages": total_pages,
        "has_next_page": page < total_pages,
        "has_previous_page": page > 1 && total > 0,
    })
}
