//! Listing submissions with their status, and changing a status.

use std::cmp::Reverse;

use futures_util::future::join_all;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{MergedItem, Status, StatusRecord, Submission};
use crate::state::AppState;
use crate::store::{self, StatusStore};

/// Body of an update request. Both fields are optional here so that a
/// missing field is reported as a 400 rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default)]
    pub submission_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Fetch the configured form's submissions and join each with its status,
/// newest first. Recomputed on every call.
pub async fn list_submissions(state: &AppState) -> Result<Vec<MergedItem>, AppError> {
    let forms = state.forms.as_ref().ok_or_else(|| {
        AppError::Misconfigured(
            "Missing env: FORMDESK_SITE_ID or FORMDESK_API_TOKEN".to_string(),
        )
    })?;

    let form_name = &state.config.forms.form_name;
    let form_id = forms
        .find_form_id(form_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Form not found by name: {form_name}")))?;

    let submissions = forms.list_submissions(&form_id).await?;
    let items = merge_statuses(state.store.as_ref(), submissions).await;

    tracing::debug!(%form_id, count = items.len(), "Listed submissions");
    Ok(items)
}

/// Look up every submission's status concurrently, then sort newest first.
pub async fn merge_statuses(store: &dyn StatusStore, submissions: Vec<Submission>) -> Vec<MergedItem> {
    let lookups = submissions.into_iter().map(|submission| async move {
        let status = store::lookup_status(store, &submission.id).await;
        MergedItem::new(submission, status)
    });

    let mut items = join_all(lookups).await;
    sort_newest_first(&mut items);
    items
}

/// Descending by creation time. Missing or invalid timestamps sort as epoch
/// zero; ties keep their upstream order.
pub fn sort_newest_first(items: &mut [MergedItem]) {
    items.sort_by_key(|item| Reverse(item.submission.created_millis()));
}

/// Validate and persist a status change. Last write wins.
pub async fn update_status(
    store: &dyn StatusStore,
    update: &StatusUpdate,
) -> Result<StatusRecord, AppError> {
    let submission_id = update
        .submission_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("submissionId is required".to_string()))?;

    let status: Status = update
        .status
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            AppError::BadRequest("status must be one of NEW/IN_PROGRESS/DONE".to_string())
        })?;

    let record = StatusRecord::now(status);
    store::save_status(store, submission_id, &record).await?;

    tracing::info!(submission_id, %status, "Status updated");
    Ok(record)
}
