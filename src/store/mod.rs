//! Namespaced JSON blob storage and the status records kept in it.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{Status, StatusRecord};

pub use memory::MemoryStatusStore;
pub use postgres::PgStatusStore;

/// Namespace holding one record per submission.
pub const STATUS_NAMESPACE: &str = "ticket-status";

#[derive(Debug)]
pub enum StoreError {
    Backend(String),
    Codec(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Backend(msg) => write!(f, "backend: {msg}"),
            StoreError::Codec(msg) => write!(f, "codec: {msg}"),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}

/// Key-value store over JSON values, scoped to a single namespace.
/// Writes to the same key simply overwrite; there is no versioning.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;
}

pub fn status_key(submission_id: &str) -> String {
    format!("status:{submission_id}")
}

pub async fn get_status_record(
    store: &dyn StatusStore,
    submission_id: &str,
) -> Result<Option<StatusRecord>, StoreError> {
    match store.get(&status_key(submission_id)).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Current status of a submission for display purposes.
///
/// Any read or decode failure yields [`Status::New`]. A broken record must
/// never take the whole list down, so the error is only logged.
pub async fn lookup_status(store: &dyn StatusStore, submission_id: &str) -> Status {
    match get_status_record(store, submission_id).await {
        Ok(Some(record)) => record.status,
        Ok(None) => Status::default(),
        Err(e) => {
            tracing::debug!(submission_id, "Status lookup failed, using default: {e}");
            Status::default()
        }
    }
}

pub async fn save_status(
    store: &dyn StatusStore,
    submission_id: &str,
    record: &StatusRecord,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(record)?;
    store.set(&status_key(submission_id), value).await
}
