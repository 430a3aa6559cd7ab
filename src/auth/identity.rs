use axum::http::{header, HeaderMap};

use super::jwt;
use super::{Authenticator, Principal};
use crate::error::AppError;

/// Accepts bearer tokens minted by the identity provider (HS256).
pub struct IdentityAuthenticator {
    secret: Option<String>,
}

impl IdentityAuthenticator {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    fn secret(&self) -> Result<&str, AppError> {
        self.secret.as_deref().ok_or_else(|| {
            AppError::Misconfigured("FORMDESK_IDENTITY_SECRET is not set".to_string())
        })
    }
}

impl Authenticator for IdentityAuthenticator {
    fn credential_label(&self) -> &'static str {
        "Identity token"
    }

    fn credential<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
    }

    fn ensure_configured(&self) -> Result<(), AppError> {
        self.secret().map(|_| ())
    }

    fn verify(&self, credential: &str) -> Result<Principal, AppError> {
        let secret = self.secret()?;

        let claims = jwt::decode_token(credential, secret).map_err(|e| {
            tracing::debug!("Identity token rejected: {e}");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(Principal {
            subject: claims.email.unwrap_or(claims.sub),
        })
    }
}
