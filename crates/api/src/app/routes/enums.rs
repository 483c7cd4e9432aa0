//! Reference enumerations for front-end dropdowns.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use fxcrm_auth::Role;
use fxcrm_clients::{AcquisitionSource, Gender};
use fxcrm_core::Status;
use fxcrm_marketing::{CampaignStatus, Channel};
use fxcrm_transactions::Currency;

pub async fn all() -> axum::response::Response {
    let currencies = Currency::ALL
        .iter()
        .map(|c| json!({ "value": c.as_str(), "label": c.label(), "symbol": c.symbol() }))
        .collect::<Vec<_>>();

    (
        StatusCode::OK,
        Json(json!({
            "currencies": currencies,
            "genders": pairs(Gender::ALL.iter().map(|v| (v.as_str(), v.label()))),
            "roles": pairs(Role::ALL.iter().map(|v| (v.as_str(), v.label()))),
            "statuses": pairs(Status::ALL.iter().map(|v| (v.as_str(), v.label()))),
            "acquisition_sources": pairs(AcquisitionSource::ALL.iter().map(|v| (v.as_str(), v.label()))),
            "campaign_statuses": pairs(CampaignStatus::ALL.iter().map(|v| (v.as_str(), v.label()))),
            "channel_types": pairs(Channel::ALL.iter().map(|v| (v.as_str(), v.label()))),
        })),
    )
        .into_response()
}

fn pairs<'a>(values: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<serde_json::Value> {
    values
        .map(|(value, label)| json!({ "value": value, "label": label }))
        .collect()
}
