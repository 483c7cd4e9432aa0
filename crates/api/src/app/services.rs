use std::sync::Arc;

use chrono::Utc;

use fxcrm_auth::{hash_password, Authenticator, NewUser, Role, User};
use fxcrm_clients::{Client, ClientId, Recommendation, RecommendationId, SegmentEntry, SegmentEntryId};
use fxcrm_core::{OfficeId, UserId};
use fxcrm_infra::{InMemoryStore, InMemoryUserDirectory};
use fxcrm_marketing::{ActionId, Campaign, CampaignAction, CampaignId, QuickMessage, QuickMessageId};
use fxcrm_offices::{ExchangeOffice, OfficeSummary};
use fxcrm_transactions::{Transaction, TransactionId};

/// The login-path authenticator over the shared user directory.
pub type AppAuthenticator = Authenticator<Arc<InMemoryUserDirectory>>;

/// Store wiring shared by all routes.
///
/// Every store is independently locked; requests coordinate through nothing
/// else, so handlers stay free of cross-request state.
pub struct AppServices {
    pub users: Arc<InMemoryUserDirectory>,
    pub offices: Arc<InMemoryStore<OfficeId, ExchangeOffice>>,
    pub clients: Arc<InMemoryStore<ClientId, Client>>,
    pub transactions: Arc<InMemoryStore<TransactionId, Transaction>>,
    pub campaigns: Arc<InMemoryStore<CampaignId, Campaign>>,
    pub actions: Arc<InMemoryStore<ActionId, CampaignAction>>,
    pub quick_messages: Arc<InMemoryStore<QuickMessageId, QuickMessage>>,
    pub segment_history: Arc<InMemoryStore<SegmentEntryId, SegmentEntry>>,
    pub recommendations: Arc<InMemoryStore<RecommendationId, Recommendation>>,
}

impl AppServices {
    /// Office summary for response projections; `None` when the reference is
    /// dangling (logged upstream as a data-integrity condition).
    pub fn office_summary(&self, office_id: OfficeId) -> Option<OfficeSummary> {
        self.offices.get(&office_id).map(|o| o.summary())
    }
}

pub fn build_services() -> AppServices {
    AppServices {
        users: Arc::new(InMemoryUserDirectory::new()),
        offices: Arc::new(InMemoryStore::new()),
        clients: Arc::new(InMemoryStore::new()),
        transactions: Arc::new(InMemoryStore::new()),
        campaigns: Arc::new(InMemoryStore::new()),
        actions: Arc::new(InMemoryStore::new()),
        quick_messages: Arc::new(InMemoryStore::new()),
        segment_history: Arc::new(InMemoryStore::new()),
        recommendations: Arc::new(InMemoryStore::new()),
    }
}

/// Seed the first administrator from `ADMIN_EMAIL`/`ADMIN_PASSWORD`.
///
/// Without it a fresh deployment has no way to log in; skipped silently when
/// the variables are absent or the account already exists.
pub fn bootstrap_admin_from_env(services: &AppServices) {
    let (Ok(email), Ok(password)) = (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD"))
    else {
        return;
    };

    if services.users.email_taken(email.trim(), None) {
        return;
    }

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!("admin bootstrap skipped: {e}");
            return;
        }
    };

    match User::create(NewUser {
        id: UserId::new(),
        email,
        password_hash,
        first_name: "System".to_string(),
        last_name: "Administrator".to_string(),
        phone: String::new(),
        role: Role::Admin,
        office_id: None,
        created_at: Utc::now(),
    }) {
        Ok(admin) => {
            tracing::info!(user_id = %admin.id, "bootstrapped initial administrator");
            services.users.insert(admin);
        }
        Err(e) => tracing::warn!("admin bootstrap skipped: {e}"),
    }
}
