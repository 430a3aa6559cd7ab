pub mod extractor;
pub mod identity;
pub mod jwt;
pub mod shared_secret;

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::config::{AuthConfig, AuthMode};
use crate::error::AppError;

pub use identity::IdentityAuthenticator;
pub use shared_secret::SharedSecretAuthenticator;

/// Who made an authenticated call.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub subject: String,
}

/// Checks a caller's credential before any handler work happens.
pub trait Authenticator: Send + Sync {
    /// Label shown next to the credential field of the login form.
    fn credential_label(&self) -> &'static str;

    /// Raw credential carried by the request, if any.
    fn credential<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str>;

    /// Fails when the server lacks the setting needed to check credentials.
    fn ensure_configured(&self) -> Result<(), AppError>;

    fn verify(&self, credential: &str) -> Result<Principal, AppError>;

    /// A missing setting is reported before a missing credential.
    fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AppError> {
        self.ensure_configured()?;
        let credential = self
            .credential(headers)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;
        self.verify(credential)
    }
}

pub fn from_config(config: &AuthConfig) -> Arc<dyn Authenticator> {
    match config.mode {
        AuthMode::SharedSecret => {
            Arc::new(SharedSecretAuthenticator::new(config.admin_key.clone()))
        }
        AuthMode::Identity => Arc::new(IdentityAuthenticator::new(config.identity_secret.clone())),
    }
}
