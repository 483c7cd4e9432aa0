use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use fxcrm_api::app::{build_app_with, services::build_services, AppServices};
use fxcrm_auth::{hash_password, NewUser, Role, TokenClaims, User};
use fxcrm_core::UserId;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port, seeded directly
        // through the stores.
        let services = Arc::new(build_services());
        let app = build_app_with(services.clone(), JWT_SECRET.to_string());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    fn seed_admin(&self, email: &str, password: &str) -> UserId {
        let admin = User::create(NewUser {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            first_name: "Root".to_string(),
            last_name: "Admin".to_string(),
            phone: String::new(),
            role: Role::Admin,
            office_id: None,
            created_at: Utc::now(),
        })
        .unwrap();
        let id = admin.id;
        self.services.users.insert(admin);
        id
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(client: &reqwest::Client, base_url: &str, email: &str, password: &str) -> String {
    let res = client
        .post(format!("{}/auth/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "login failed for {email}");
    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Full admin flow: create an office and an agent bound to it, then log the
/// agent in.
async fn setup_office_and_agent(
    client: &reqwest::Client,
    base_url: &str,
    admin_token: &str,
    office_name: &str,
    agent_email: &str,
) -> (String, String) {
    let res = client
        .post(format!("{}/offices", base_url))
        .bearer_auth(admin_token)
        .json(&json!({
            "name": office_name,
            "email": format!("{}@offices.example", office_name.to_lowercase().replace(' ', "-")),
            "owner": "Owner",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let office: serde_json::Value = res.json().await.unwrap();
    let office_id = office["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/users", base_url))
        .bearer_auth(admin_token)
        .json(&json!({
            "email": agent_email,
            "password": "agent-pass",
            "first_name": "Agent",
            "last_name": "User",
            "role": "agent",
            "office_id": office_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let agent_token = login(client, base_url, agent_email, "agent-pass").await;
    (office_id, agent_token)
}

async fn create_client_record(
    client: &reqwest::Client,
    base_url: &str,
    agent_token: &str,
    first_name: &str,
) -> String {
    let res = client
        .post(format!("{}/clients", base_url))
        .bearer_auth(agent_token)
        .json(&json!({
            "first_name": first_name,
            "last_name": "Tester",
            "nationality": "Moroccan",
            "gender": "female",
            "acquisition_source": "walk_in",
            "segment": "vip",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client.get(format!("{}/health", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let srv = TestServer::spawn().await;
    srv.seed_admin("admin@example.com", "admin-pass");

    let client = reqwest::Client::new();

    let unknown = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "nobody@example.com", "password": "whatever" }))
        .send()
        .await
        .unwrap();
    let wrong = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "admin@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let unknown_body: serde_json::Value = unknown.json().await.unwrap();
    let wrong_body: serde_json::Value = wrong.json().await.unwrap();
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn login_returns_profile_without_hash_and_me_works() {
    let srv = TestServer::spawn().await;
    srv.seed_admin("admin@example.com", "admin-pass");

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "  Admin@Example.COM ", "password": "admin-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["expires_in"], 24 * 60 * 60);

    let token = body["token"].as_str().unwrap();
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["email"], "admin@example.com");
}

#[tokio::test]
async fn forged_and_expired_tokens_are_rejected() {
    let srv = TestServer::spawn().await;
    let admin_id = srv.seed_admin("admin@example.com", "admin-pass");

    let mint = |secret: &str, exp_offset: ChronoDuration| {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: admin_id,
            role: Role::Admin,
            iat: now.timestamp(),
            exp: (now + exp_offset).timestamp(),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    };

    let client = reqwest::Client::new();

    // Wrong signing secret.
    let forged = mint("other-secret", ChronoDuration::minutes(10));
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Correct secret, already expired.
    let expired = mint(JWT_SECRET, ChronoDuration::minutes(-10));
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Sanity: a valid mint with the right secret passes.
    let valid = mint(JWT_SECRET, ChronoDuration::minutes(10));
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(valid)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn agents_cannot_reach_admin_endpoints() {
    let srv = TestServer::spawn().await;
    srv.seed_admin("admin@example.com", "admin-pass");

    let client = reqwest::Client::new();
    let admin_token = login(&client, &srv.base_url, "admin@example.com", "admin-pass").await;
    let (_office_id, agent_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Rabat", "agent@example.com").await;

    let res = client
        .post(format!("{}/offices", srv.base_url))
        .bearer_auth(&agent_token)
        .json(&json!({ "name": "Rogue", "email": "rogue@offices.example", "owner": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/offices", srv.base_url))
        .bearer_auth(&agent_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn office_scoping_isolates_agents() {
    let srv = TestServer::spawn().await;
    srv.seed_admin("admin@example.com", "admin-pass");

    let client = reqwest::Client::new();
    let admin_token = login(&client, &srv.base_url, "admin@example.com", "admin-pass").await;

    let (office1, agent1_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Casablanca", "a1@example.com")
            .await;
    let (_office2, agent2_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Marrakech", "a2@example.com")
            .await;

    // Agent 1 registers a client in office 1.
    let client_id = create_client_record(&client, &srv.base_url, &agent1_token, "Sara").await;

    // Same-office access allowed.
    let res = client
        .get(format!("{}/clients/{}", srv.base_url, client_id))
        .bearer_auth(&agent1_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Cross-office access forbidden, with a message that names no office.
    let res = client
        .get(format!("{}/clients/{}", srv.base_url, client_id))
        .bearer_auth(&agent2_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "office mismatch");

    // Admin reads across offices.
    let res = client
        .get(format!("{}/clients/{}", srv.base_url, client_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Listings are pre-filtered per office.
    let res = client
        .get(format!("{}/clients/my-office", srv.base_url))
        .bearer_auth(&agent1_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 1);

    let res = client
        .get(format!("{}/clients/my-office", srv.base_url))
        .bearer_auth(&agent2_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 0);

    // Admin by-office listing sees the record under the claimed office.
    let res = client
        .get(format!("{}/clients/by-office/{}", srv.base_url, office1))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn transaction_lifecycle_and_scoping() {
    let srv = TestServer::spawn().await;
    srv.seed_admin("admin@example.com", "admin-pass");

    let client = reqwest::Client::new();
    let admin_token = login(&client, &srv.base_url, "admin@example.com", "admin-pass").await;

    let (office1, agent1_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Casablanca", "a1@example.com")
            .await;
    let (_office2, agent2_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Marrakech", "a2@example.com")
            .await;

    let client_id = create_client_record(&client, &srv.base_url, &agent1_token, "Sara").await;

    // Same-currency pair rejected up front.
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&agent1_token)
        .json(&json!({
            "client_id": client_id,
            "amount": 100.0,
            "source_currency": "EUR",
            "target_currency": "EUR",
            "exchange_rate": 1.0,
            "transaction_date": Utc::now().to_rfc3339(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Agent 1 records a transaction for their client.
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&agent1_token)
        .json(&json!({
            "client_id": client_id,
            "amount": 1000.0,
            "source_currency": "EUR",
            "target_currency": "MAD",
            "exchange_rate": 10.85,
            "transaction_date": Utc::now().to_rfc3339(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let tx: serde_json::Value = res.json().await.unwrap();
    let tx_id = tx["id"].as_str().unwrap().to_string();

    // Agent 2 cannot record one for a foreign client.
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&agent2_token)
        .json(&json!({
            "client_id": client_id,
            "amount": 50.0,
            "source_currency": "USD",
            "target_currency": "MAD",
            "exchange_rate": 10.0,
            "transaction_date": Utc::now().to_rfc3339(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Single-resource reads follow the same policy: own office allowed,
    // foreign office forbidden, admin always allowed.
    let res = client
        .get(format!("{}/transactions/{}", srv.base_url, tx_id))
        .bearer_auth(&agent1_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/transactions/{}", srv.base_url, tx_id))
        .bearer_auth(&agent2_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/transactions/{}", srv.base_url, tx_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Per-office listings stay isolated.
    let res = client
        .get(format!("{}/transactions/my-office", srv.base_url))
        .bearer_auth(&agent1_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/transactions/my-office", srv.base_url))
        .bearer_auth(&agent2_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    // Agent 2 cannot list a foreign client's transactions either.
    let res = client
        .get(format!("{}/transactions/by-client/{}", srv.base_url, client_id))
        .bearer_auth(&agent2_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admin by-office listing and correction flow.
    let res = client
        .get(format!("{}/transactions/by-office/{}", srv.base_url, office1))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let res = client
        .put(format!("{}/transactions/{}", srv.base_url, tx_id))
        .bearer_auth(&agent1_token)
        .json(&json!({
            "amount": 900.0,
            "source_currency": "EUR",
            "target_currency": "MAD",
            "exchange_rate": 10.8,
            "transaction_date": Utc::now().to_rfc3339(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(format!("{}/transactions/{}", srv.base_url, tx_id))
        .bearer_auth(&admin_token)
        .json(&json!({
            "amount": 900.0,
            "source_currency": "EUR",
            "target_currency": "MAD",
            "exchange_rate": 10.8,
            "transaction_date": Utc::now().to_rfc3339(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/transactions/{}", srv.base_url, tx_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn deactivation_invalidates_live_tokens() {
    let srv = TestServer::spawn().await;
    srv.seed_admin("admin@example.com", "admin-pass");

    let client = reqwest::Client::new();
    let admin_token = login(&client, &srv.base_url, "admin@example.com", "admin-pass").await;
    let (_office_id, agent_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Rabat", "agent@example.com").await;

    // Token works now.
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(&agent_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    let agent_id = me["id"].as_str().unwrap().to_string();

    // Admin deactivates the agent.
    let res = client
        .patch(format!("{}/users/{}/status", srv.base_url, agent_id))
        .bearer_auth(&admin_token)
        .json(&json!({ "status": "inactive" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Same token, previously valid, rejected on the next request.
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(&agent_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // And the account can no longer log in, with the distinct disabled error.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "agent@example.com", "password": "agent-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "account_disabled");
}

#[tokio::test]
async fn campaigns_and_quick_messages_stay_office_bound() {
    let srv = TestServer::spawn().await;
    srv.seed_admin("admin@example.com", "admin-pass");

    let client = reqwest::Client::new();
    let admin_token = login(&client, &srv.base_url, "admin@example.com", "admin-pass").await;

    let (_office1, agent1_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Casablanca", "a1@example.com")
            .await;
    let (_office2, agent2_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Marrakech", "a2@example.com")
            .await;

    let client1 = create_client_record(&client, &srv.base_url, &agent1_token, "Sara").await;
    let client2 = create_client_record(&client, &srv.base_url, &agent2_token, "Omar").await;

    // Targeting a foreign client is rejected without revealing existence.
    let start = Utc::now();
    let end = start + ChronoDuration::days(30);
    let res = client
        .post(format!("{}/campaigns", srv.base_url))
        .bearer_auth(&agent1_token)
        .json(&json!({
            "title": "Cross-office promo",
            "start_date": start.to_rfc3339(),
            "end_date": end.to_rfc3339(),
            "target_clients": [client2],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // A legitimate campaign in office 1.
    let res = client
        .post(format!("{}/campaigns", srv.base_url))
        .bearer_auth(&agent1_token)
        .json(&json!({
            "title": "Summer promo",
            "start_date": start.to_rfc3339(),
            "end_date": end.to_rfc3339(),
            "target_clients": [client1],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let campaign: serde_json::Value = res.json().await.unwrap();
    let campaign_id = campaign["id"].as_str().unwrap().to_string();
    assert_eq!(campaign["status"], "draft");

    // Agent 2 sees neither the campaign nor its actions.
    let res = client
        .get(format!("{}/campaigns/{}", srv.base_url, campaign_id))
        .bearer_auth(&agent2_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/campaigns", srv.base_url))
        .bearer_auth(&agent2_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    // Status flip + an action under the campaign.
    let res = client
        .patch(format!("{}/campaigns/{}/status", srv.base_url, campaign_id))
        .bearer_auth(&agent1_token)
        .json(&json!({ "status": "active" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/campaigns/{}/actions", srv.base_url, campaign_id))
        .bearer_auth(&agent1_token)
        .json(&json!({
            "title": "Kickoff blast",
            "channel": "whatsapp",
            "content": "EUR->MAD at 10.9 this week",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Quick message to own clients works; to foreign clients it does not.
    let res = client
        .post(format!("{}/quick-messages", srv.base_url))
        .bearer_auth(&agent1_token)
        .json(&json!({
            "title": "Rate alert",
            "channel": "sms",
            "content": "Good EUR rate today",
            "target_clients": [client1],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/quick-messages", srv.base_url))
        .bearer_auth(&agent2_token)
        .json(&json!({
            "title": "Rate alert",
            "channel": "sms",
            "content": "Good EUR rate today",
            "target_clients": [client1],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn office_lifecycle_uniqueness_and_reference_guard() {
    let srv = TestServer::spawn().await;
    srv.seed_admin("admin@example.com", "admin-pass");

    let client = reqwest::Client::new();
    let admin_token = login(&client, &srv.base_url, "admin@example.com", "admin-pass").await;
    let (office_id, agent_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Casablanca", "a1@example.com")
            .await;

    // Office email is unique.
    let res = client
        .post(format!("{}/offices", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({
            "name": "Duplicate",
            "email": "casablanca@offices.example",
            "owner": "Owner",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The agent sees their own office without knowing its id.
    let res = client
        .get(format!("{}/offices/my-office", srv.base_url))
        .bearer_auth(&agent_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"].as_str().unwrap(), office_id);
    assert_eq!(body["name"], "Casablanca");

    // An office with users cannot be deleted.
    let res = client
        .delete(format!("{}/offices/{}", srv.base_url, office_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Update with no fields is rejected; a real partial update sticks.
    let res = client
        .put(format!("{}/offices/{}", srv.base_url, office_id))
        .bearer_auth(&admin_token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .put(format!("{}/offices/{}", srv.base_url, office_id))
        .bearer_auth(&admin_token)
        .json(&json!({ "phone": "+212522999999" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["phone"], "+212522999999");

    // Reference data for the front end is served to any authenticated user.
    let res = client
        .get(format!("{}/enums", srv.base_url))
        .bearer_auth(&agent_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["currencies"].as_array().unwrap().len(), 16);
    assert_eq!(body["roles"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn segment_history_is_recorded_and_scoped_via_the_client() {
    let srv = TestServer::spawn().await;
    srv.seed_admin("admin@example.com", "admin-pass");

    let client = reqwest::Client::new();
    let admin_token = login(&client, &srv.base_url, "admin@example.com", "admin-pass").await;

    let (_office1, agent1_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Casablanca", "a1@example.com")
            .await;
    let (_office2, agent2_token) =
        setup_office_and_agent(&client, &srv.base_url, &admin_token, "Marrakech", "a2@example.com")
            .await;

    let client_id = create_client_record(&client, &srv.base_url, &agent1_token, "Sara").await;

    // Segment change adds a second entry.
    let res = client
        .put(format!("{}/clients/{}", srv.base_url, client_id))
        .bearer_auth(&agent1_token)
        .json(&json!({ "segment": "regular" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/clients/{}/segment-history", srv.base_url, client_id))
        .bearer_auth(&agent1_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["segment"], "regular");

    // Transitive scope: the history is as office-bound as the client.
    let res = client
        .get(format!("{}/clients/{}/segment-history", srv.base_url, client_id))
        .bearer_auth(&agent2_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
