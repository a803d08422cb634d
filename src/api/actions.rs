use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::ApiResult;
use super::payloads::{
    dedup_ids, require, require_text, ActionPayload, ActionUpdate, AttachSwotEntry, DetailPayload,
    JsonBody,
};
use super::{delete_or_404, find_or_404, save_or_404, AppState};
use crate::entity::{Action, PopulatedAction};
use crate::storage::Filter;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/actions", get(list_actions).post(create_action))
        .route("/actions/issue/{issue_id}", get(list_actions_by_issue))
        .route(
            "/actions/{id}",
            get(get_action).put(update_action).delete(delete_action),
        )
        .route("/actions/{id}/swot-entries", post(attach_swot_entry))
        .route(
            "/actions/{id}/swot-entries/{swot_entry_id}",
            delete(detach_swot_entry),
        )
        .route(
            "/actions/{id}/detail",
            get(get_detail).put(put_detail).delete(clear_detail),
        )
}

async fn list_actions(State(state): State<AppState>) -> ApiResult<Json<Vec<Action>>> {
    Ok(Json(state.repo.list(Filter::All).await?))
}

/// Actions of one issue, with their SWOT entries resolved.
async fn list_actions_by_issue(
    State(state): State<AppState>,
    Path(issue_id): Path<String>,
) -> ApiResult<Json<Vec<PopulatedAction>>> {
    if Uuid::parse_str(&issue_id).is_err() {
        return Ok(Json(Vec::new()));
    }
    let actions: Vec<Action> = state
        .repo
        .list(Filter::field_eq("issueId", issue_id))
        .await?;

    let mut populated = Vec::with_capacity(actions.len());
    for action in actions {
        populated.push(state.repo.populate(action).await?);
    }
    Ok(Json(populated))
}

async fn get_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Action>> {
    Ok(Json(find_or_404(&state.repo, &id).await?))
}

async fn create_action(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ActionPayload>,
) -> ApiResult<(StatusCode, Json<Action>)> {
    let mut action = Action::new(
        require("issueId", payload.issue_id)?,
        require_text("title", payload.title)?,
        require_text("description", payload.description)?,
        require_text("createdBy", payload.created_by)?,
    );
    action.detail = payload.detail.unwrap_or_default();
    action.status = payload.status.unwrap_or_default();
    action.swot_entries = dedup_ids(payload.swot_entries.unwrap_or_default());

    state.repo.insert(&action).await?;
    tracing::info!(
        id = %action.base.id,
        issue_id = %action.issue_id,
        linked = action.swot_entries.len(),
        "action created"
    );
    Ok((StatusCode::CREATED, Json(action)))
}

/// Title and description are the only editable fields and both must be sent.
async fn update_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ActionUpdate>,
) -> ApiResult<Json<Action>> {
    let title = require_text("title", payload.title)?;
    let description = require_text("description", payload.description)?;

    let mut action: Action = find_or_404(&state.repo, &id).await?;
    action.title = title;
    action.description = description;
    save_or_404(&state.repo, &mut action).await?;
    Ok(Json(action))
}

/// Relations pointing at the action are left in place.
async fn delete_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    delete_or_404::<Action>(&state.repo, &id).await
}

async fn attach_swot_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<AttachSwotEntry>,
) -> ApiResult<Json<PopulatedAction>> {
    let mut action: Action = find_or_404(&state.repo, &id).await?;
    let swot_entry_id = require("swotEntryId", payload.swot_entry_id)?;

    if action.attach_swot_entry(swot_entry_id) {
        save_or_404(&state.repo, &mut action).await?;
        tracing::debug!(action_id = %action.base.id, %swot_entry_id, "SWOT entry attached");
    }
    Ok(Json(state.repo.populate(action).await?))
}

async fn detach_swot_entry(
    State(state): State<AppState>,
    Path((id, swot_entry_id)): Path<(String, String)>,
) -> ApiResult<Json<PopulatedAction>> {
    let mut action: Action = find_or_404(&state.repo, &id).await?;

    // An id that is not a UUID cannot be linked, so there is nothing to remove
    let detached = match Uuid::parse_str(&swot_entry_id) {
        Ok(swot_entry_id) => action.detach_swot_entry(&swot_entry_id),
        Err(_) => false,
    };
    if detached {
        save_or_404(&state.repo, &mut action).await?;
        tracing::debug!(action_id = %action.base.id, %swot_entry_id, "SWOT entry detached");
    }
    Ok(Json(state.repo.populate(action).await?))
}

async fn get_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let action: Action = find_or_404(&state.repo, &id).await?;
    Ok(Json(json!({ "detail": action.detail })))
}

async fn put_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<DetailPayload>,
) -> ApiResult<Json<Action>> {
    let mut action: Action = find_or_404(&state.repo, &id).await?;
    action.detail = payload.detail.unwrap_or_default();
    save_or_404(&state.repo, &mut action).await?;
    Ok(Json(action))
}

async fn clear_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Action>> {
    let mut action: Action = find_or_404(&state.repo, &id).await?;
    if action.detail.is_empty() {
        return Ok(Json(action));
    }
    action.detail.clear();
    save_or_404(&state.repo, &mut action).await?;
    Ok(Json(action))
}
