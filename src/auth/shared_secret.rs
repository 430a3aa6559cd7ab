use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

use super::{Authenticator, Principal};
use crate::error::AppError;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

pub struct SharedSecretAuthenticator {
    expected: Option<String>,
}

impl SharedSecretAuthenticator {
    pub fn new(expected: Option<String>) -> Self {
        Self { expected }
    }

    fn expected(&self) -> Result<&str, AppError> {
        self.expected
            .as_deref()
            .ok_or_else(|| AppError::Misconfigured("FORMDESK_ADMIN_KEY is not set".to_string()))
    }
}

impl Authenticator for SharedSecretAuthenticator {
    fn credential_label(&self) -> &'static str {
        "Admin key"
    }

    fn credential<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers.get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok())
    }

    fn ensure_configured(&self) -> Result<(), AppError> {
        self.expected().map(|_| ())
    }

    fn verify(&self, credential: &str) -> Result<Principal, AppError> {
        let expected = self.expected()?;

        // Length mismatch compares unequal without short-circuiting on content.
        if credential.as_bytes().ct_eq(expected.as_bytes()).into() {
            Ok(Principal {
                subject: "admin".to_string(),
            })
        } else {
            Err(AppError::Unauthorized("Unauthorized".to_string()))
        }
    }
}
