use axum::{routing::get, Router};

pub mod auth;
pub mod campaigns;
pub mod clients;
pub mod enums;
pub mod offices;
pub mod quick_messages;
pub mod system;
pub mod transactions;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/enums", get(enums::all))
        .nest("/offices", offices::router())
        .nest("/users", users::router())
        .nest("/clients", clients::router())
        .nest("/transactions", transactions::router())
        .nest("/campaigns", campaigns::router())
        .nest("/quick-messages", quick_messages::router())
}
