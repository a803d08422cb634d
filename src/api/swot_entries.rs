use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::payloads::{require, require_text, JsonBody, SwotEntryPayload, SwotEntryUpdate};
use super::{delete_or_404, find_or_404, save_or_404, AppState};
use crate::entity::SwotEntry;
use crate::storage::Filter;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/swot-entries", get(list_entries).post(create_entry))
        .route("/swot-entries/issue/{issue_id}", get(list_entries_by_issue))
        .route(
            "/swot-entries/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

async fn list_entries(State(state): State<AppState>) -> ApiResult<Json<Vec<SwotEntry>>> {
    Ok(Json(state.repo.list(Filter::All).await?))
}

async fn list_entries_by_issue(
    State(state): State<AppState>,
    Path(issue_id): Path<String>,
) -> ApiResult<Json<Vec<SwotEntry>>> {
    // A malformed id simply matches nothing
    if Uuid::parse_str(&issue_id).is_err() {
        return Ok(Json(Vec::new()));
    }
    Ok(Json(
        state
            .repo
            .list(Filter::field_eq("issueId", issue_id))
            .await?,
    ))
}

async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SwotEntry>> {
    Ok(Json(find_or_404(&state.repo, &id).await?))
}

async fn create_entry(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SwotEntryPayload>,
) -> ApiResult<(StatusCode, Json<SwotEntry>)> {
    let entry = SwotEntry::new(
        require("issueId", payload.issue_id)?,
        require("type", payload.swot_type)?,
        require_text("description", payload.description)?,
        require_text("createdBy", payload.created_by)?,
    );

    state.repo.insert(&entry).await?;
    tracing::info!(id = %entry.base.id, issue_id = %entry.issue_id, swot_type = %entry.swot_type, "SWOT entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Only the description can change after creation.
async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<SwotEntryUpdate>,
) -> ApiResult<Json<SwotEntry>> {
    tracing::debug!(%id, "SWOT entry update requested");

    let description = match payload.description {
        Some(d) if !d.trim().is_empty() => d,
        _ => return Err(ApiError::Validation("Description is required".to_string())),
    };

    let mut entry: SwotEntry = find_or_404(&state.repo, &id).await?;
    entry.description = description;
    save_or_404(&state.repo, &mut entry).await?;

    tracing::debug!(%id, "SWOT entry updated");
    Ok(Json(entry))
}

/// Actions keep any reference to the deleted entry; populated views skip it.
async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    delete_or_404::<SwotEntry>(&state.repo, &id).await
}
