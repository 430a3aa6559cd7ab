use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed,
    TooManyRequests(String),
    /// Non-success answer from the forms API, passed through as-is.
    Upstream { status: u16, body: String },
    /// Transport-level failure talking to the forms API.
    Gateway(String),
    Misconfigured(String),
    Internal(String),
    Store(StoreError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::TooManyRequests(msg) => write!(f, "Too Many Requests: {msg}"),
            AppError::Upstream { status, body } => write!(f, "Forms API error: {status} {body}"),
            AppError::Gateway(msg) => write!(f, "Gateway Error: {msg}"),
            AppError::Misconfigured(msg) => write!(f, "Misconfigured: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Store(err) => write!(f, "Store Error: {err}"),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Misconfigured(_) | AppError::Internal(_) | AppError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to hand to the client. Internal details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::TooManyRequests(msg)
            | AppError::Misconfigured(msg) => msg.clone(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::Upstream { status, body } => format!("Forms API error: {status} {body}"),
            AppError::Gateway(_) => "Forms API unreachable".to_string(),
            AppError::Internal(_) | AppError::Store(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(msg) => tracing::error!("Internal error: {msg}"),
            AppError::Store(err) => tracing::error!("Store error: {err}"),
            AppError::Gateway(msg) => tracing::warn!("Forms API request failed: {msg}"),
            AppError::Upstream { status, .. } => tracing::warn!("Forms API returned {status}"),
            AppError::Misconfigured(msg) => tracing::error!("Misconfiguration: {msg}"),
            _ => {}
        }

        let body = json!({ "ok": false, "error": self.public_message() });
        (self.status_code(), axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Gateway(err.to_string())
    }
}
