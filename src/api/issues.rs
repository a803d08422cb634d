use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use super::error::ApiResult;
use super::payloads::{optional_text, require_text, IssuePayload, JsonBody};
use super::{delete_or_404, find_or_404, save_or_404, AppState};
use crate::entity::Issue;
use crate::storage::Filter;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/issues", get(list_issues).post(create_issue))
        .route(
            "/issues/{id}",
            get(get_issue).put(update_issue).delete(delete_issue),
        )
}

async fn list_issues(State(state): State<AppState>) -> ApiResult<Json<Vec<Issue>>> {
    Ok(Json(state.repo.list(Filter::All).await?))
}

async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Issue>> {
    Ok(Json(find_or_404(&state.repo, &id).await?))
}

async fn create_issue(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<IssuePayload>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    let mut issue = Issue::new(
        require_text("title", payload.title)?,
        require_text("description", payload.description)?,
        require_text("createdBy", payload.created_by)?,
    );
    if let Some(status) = payload.status {
        issue.status = status;
    }

    state.repo.insert(&issue).await?;
    tracing::info!(id = %issue.base.id, title = %issue.title, "issue created");
    Ok((StatusCode::CREATED, Json(issue)))
}

/// Merge the provided fields into the stored issue.
async fn update_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<IssuePayload>,
) -> ApiResult<Json<Issue>> {
    let title = optional_text("title", payload.title)?;
    let description = optional_text("description", payload.description)?;
    let created_by = optional_text("createdBy", payload.created_by)?;

    let mut issue: Issue = find_or_404(&state.repo, &id).await?;
    if let Some(title) = title {
        issue.title = title;
    }
    if let Some(description) = description {
        issue.description = description;
    }
    if let Some(created_by) = created_by {
        issue.created_by = created_by;
    }
    if let Some(status) = payload.status {
        issue.status = status;
    }

    save_or_404(&state.repo, &mut issue).await?;
    Ok(Json(issue))
}

/// Dependent SWOT entries, goals and actions are left in place.
async fn delete_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    delete_or_404::<Issue>(&state.repo, &id).await
}
