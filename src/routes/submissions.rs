use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::extractor::Admin;
use crate::error::AppError;
use crate::state::SharedState;
use crate::triage::{self, StatusUpdate};

pub async fn list(
    _admin: Admin,
    State(state): State<SharedState>,
) -> Result<Json<Value>, AppError> {
    let items = triage::list_submissions(&state).await?;
    Ok(Json(json!({ "ok": true, "items": items })))
}

pub async fn update_status(
    _admin: Admin,
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let update: StatusUpdate = if body.iter().all(u8::is_ascii_whitespace) {
        StatusUpdate::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|_| AppError::BadRequest("Invalid JSON body".to_string()))?
    };

    triage::update_status(state.store.as_ref(), &update).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
