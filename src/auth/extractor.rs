use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::Principal;
use crate::error::AppError;
use crate::state::SharedState;

/// Authenticated administrator. Rejects with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct Admin(pub Principal);

impl FromRequestParts<SharedState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let principal = state.authenticator.authenticate(&parts.headers)?;
        tracing::debug!(subject = %principal.subject, "Authenticated request");
        Ok(Admin(principal))
    }
}
