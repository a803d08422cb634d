//! Request bodies and validation helpers for the route handlers.
//!
//! Every field is optional at the parsing layer so that a missing field
//! yields a precise 400 message instead of a generic parser rejection.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use crate::entity::{ActionStatus, GoalType, IssueStatus, SwotType};

/// JSON body extractor whose rejections are reported as 400 validation errors.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

// ============================================================================
// Bodies
// ============================================================================

/// Body for creating or updating an issue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub status: Option<IssueStatus>,
}

/// Body for creating a SWOT entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwotEntryPayload {
    pub issue_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub swot_type: Option<SwotType>,
    pub description: Option<String>,
    pub created_by: Option<String>,
}

/// Body for updating a SWOT entry; everything but the description is ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwotEntryUpdate {
    pub description: Option<String>,
}

/// Body for creating or updating a goal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPayload {
    pub issue_id: Option<Uuid>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: Option<GoalType>,
    pub created_by: Option<String>,
}

/// Body for creating an action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    pub issue_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub detail: Option<String>,
    pub status: Option<ActionStatus>,
    pub swot_entries: Option<Vec<Uuid>>,
    pub created_by: Option<String>,
}

/// Body for updating an action's title and description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Body for linking a SWOT entry to an action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachSwotEntry {
    pub swot_entry_id: Option<Uuid>,
}

/// Body for the action detail sub-resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailPayload {
    pub detail: Option<String>,
}

/// Body for creating an action/SWOT relation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationPayload {
    pub action_id: Option<Uuid>,
    pub swot_id: Option<Uuid>,
    pub reasoning: Option<String>,
}

/// Body for updating a relation's reasoning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReasoningPayload {
    pub reasoning: Option<String>,
}

// ============================================================================
// Validation Helpers
// ============================================================================

/// A required text field: present and not blank.
pub fn require_text(field: &str, value: Option<String>) -> ApiResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::required(field)),
    }
}

/// A required non-text field.
pub fn require<T>(field: &str, value: Option<T>) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::required(field))
}

/// An optional text field that, when provided, may not be blank.
pub fn optional_text(field: &str, value: Option<String>) -> ApiResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ApiError::required(field)),
        other => Ok(other),
    }
}

/// Drop repeated ids, keeping first occurrences in order.
pub fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
