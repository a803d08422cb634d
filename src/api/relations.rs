use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use uuid::Uuid;

use super::error::ApiResult;
use super::payloads::{require, JsonBody, ReasoningPayload, RelationPayload};
use super::{delete_or_404, find_or_404, save_or_404, AppState};
use crate::entity::ActionSwotRelation;
use crate::storage::Filter;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/action-swot-relations",
            get(list_relations).post(create_relation),
        )
        .route(
            "/action-swot-relations/action/{action_id}",
            get(list_relations_by_action),
        )
        .route(
            "/action-swot-relations/swot/{swot_id}",
            get(list_relations_by_swot),
        )
        .route(
            "/action-swot-relations/{id}",
            get(get_relation)
                .put(update_relation)
                .delete(delete_relation),
        )
}

async fn list_relations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ActionSwotRelation>>> {
    Ok(Json(state.repo.list(Filter::All).await?))
}

async fn list_relations_by_action(
    State(state): State<AppState>,
    Path(action_id): Path<String>,
) -> ApiResult<Json<Vec<ActionSwotRelation>>> {
    list_by_field(&state, "actionId", action_id).await
}

async fn list_relations_by_swot(
    State(state): State<AppState>,
    Path(swot_id): Path<String>,
) -> ApiResult<Json<Vec<ActionSwotRelation>>> {
    list_by_field(&state, "swotId", swot_id).await
}

async fn list_by_field(
    state: &AppState,
    field: &'static str,
    raw_id: String,
) -> ApiResult<Json<Vec<ActionSwotRelation>>> {
    if Uuid::parse_str(&raw_id).is_err() {
        return Ok(Json(Vec::new()));
    }
    Ok(Json(state.repo.list(Filter::field_eq(field, raw_id)).await?))
}

async fn get_relation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ActionSwotRelation>> {
    Ok(Json(find_or_404(&state.repo, &id).await?))
}

/// The same action/entry pair may be related any number of times.
async fn create_relation(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RelationPayload>,
) -> ApiResult<(StatusCode, Json<ActionSwotRelation>)> {
    let relation = ActionSwotRelation::new(
        require("actionId", payload.action_id)?,
        require("swotId", payload.swot_id)?,
        payload.reasoning,
    );

    state.repo.insert(&relation).await?;
    tracing::info!(
        id = %relation.base.id,
        action_id = %relation.action_id,
        swot_id = %relation.swot_id,
        "relation created"
    );
    Ok((StatusCode::CREATED, Json(relation)))
}

async fn update_relation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ReasoningPayload>,
) -> ApiResult<Json<ActionSwotRelation>> {
    let mut relation: ActionSwotRelation = find_or_404(&state.repo, &id).await?;
    relation.reasoning = payload.reasoning;
    save_or_404(&state.repo, &mut relation).await?;
    Ok(Json(relation))
}

async fn delete_relation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    delete_or_404::<ActionSwotRelation>(&state.repo, &id).await
}
