use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use uuid::Uuid;

use super::error::ApiResult;
use super::payloads::{optional_text, require, require_text, GoalPayload, JsonBody};
use super::{delete_or_404, find_or_404, save_or_404, AppState};
use crate::entity::Goal;
use crate::storage::Filter;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/issue/{issue_id}", get(list_goals_by_issue))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
}

async fn list_goals(State(state): State<AppState>) -> ApiResult<Json<Vec<Goal>>> {
    Ok(Json(state.repo.list(Filter::All).await?))
}

async fn list_goals_by_issue(
    State(state): State<AppState>,
    Path(issue_id): Path<String>,
) -> ApiResult<Json<Vec<Goal>>> {
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

async fn get_goal(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Goal>> {
    Ok(Json(find_or_404(&state.repo, &id).await?))
}

async fn create_goal(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<GoalPayload>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let goal = Goal::new(
        require("issueId", payload.issue_id)?,
        require_text("description", payload.description)?,
        require("type", payload.goal_type)?,
        require_text("createdBy", payload.created_by)?,
    );

    state.repo.insert(&goal).await?;
    tracing::info!(id = %goal.base.id, issue_id = %goal.issue_id, "goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<GoalPayload>,
) -> ApiResult<Json<Goal>> {
    let description = optional_text("description", payload.description)?;
    let created_by = optional_text("createdBy", payload.created_by)?;

    let mut goal: Goal = find_or_404(&state.repo, &id).await?;
    if let Some(issue_id) = payload.issue_id {
        goal.issue_id = issue_id;
    }
    if let Some(description) = description {
        goal.description = description;
    }
    if let Some(goal_type) = payload.goal_type {
        goal.goal_type = goal_type;
    }
    if let Some(created_by) = created_by {
        goal.created_by = created_by;
    }

    save_or_404(&state.repo, &mut goal).await?;
    Ok(Json(goal))
}

async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    delete_or_404::<Goal>(&state.repo, &id).await
}
