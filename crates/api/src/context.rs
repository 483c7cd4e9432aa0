use fxcrm_auth::Principal;

/// Principal context for a request (resolved identity + office scope).
///
/// Inserted by the auth middleware; immutable for the rest of the request.
#[derive(Debug, Clone)]
pub struct RequestPrincipal(Principal);

impl RequestPrincipal {
    pub fn new(principal: Principal) -> Self {
        Self(principal)
    }

    pub fn principal(&self) -> &Principal {
        &self.0
    }
}
