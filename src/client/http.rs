//! Typed HTTP client for the board API.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::payloads::{
    ActionPayload, GoalPayload, IssuePayload, RelationPayload, SwotEntryPayload,
};
use crate::config;
use crate::entity::{Action, ActionSwotRelation, Goal, Issue, PopulatedAction, SwotEntry};
use crate::error::{Result, SwotError};

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    #[serde(default)]
    detail: String,
}

/// One method per API route. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client for `SWOT_API_BASE_URL`, or the local default.
    pub fn from_env() -> Self {
        Self::new(config::api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        tracing::debug!(%method, %url, "API request");

        let mut req = self.client.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<MessageBody>(&text)
                .map(|b| b.message)
                .unwrap_or(text);
            return Err(SwotError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, Value>(Method::GET, path, None).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, Value>(Method::DELETE, path, None).await
    }

    /// Deletes answer with a confirmation message.
    async fn delete_record(&self, path: &str) -> Result<String> {
        let body: MessageBody = self.delete(path).await?;
        Ok(body.message)
    }

    /// `GET /test`
    pub async fn health(&self) -> Result<Value> {
        self.get("/test").await
    }

    // ------------------------------------------------------------------
    // Issues
    // ------------------------------------------------------------------

    pub async fn list_issues(&self) -> Result<Vec<Issue>> {
        self.get("/api/issues").await
    }

    pub async fn get_issue(&self, id: Uuid) -> Result<Issue> {
        self.get(&format!("/api/issues/{}", id)).await
    }

    pub async fn create_issue(&self, issue: &IssuePayload) -> Result<Issue> {
        self.request(Method::POST, "/api/issues", Some(issue)).await
    }

    pub async fn update_issue(&self, id: Uuid, updates: &IssuePayload) -> Result<Issue> {
        self.request(Method::PUT, &format!("/api/issues/{}", id), Some(updates))
            .await
    }

    pub async fn delete_issue(&self, id: Uuid) -> Result<String> {
        self.delete_record(&format!("/api/issues/{}", id)).await
    }

    // ------------------------------------------------------------------
    // SWOT entries
    // ------------------------------------------------------------------

    pub async fn list_swot_entries(&self) -> Result<Vec<SwotEntry>> {
        self.get("/api/swot-entries").await
    }

    pub async fn list_swot_entries_by_issue(&self, issue_id: Uuid) -> Result<Vec<SwotEntry>> {
        self.get(&format!("/api/swot-entries/issue/{}", issue_id))
            .await
    }

    pub async fn get_swot_entry(&self, id: Uuid) -> Result<SwotEntry> {
        self.get(&format!("/api/swot-entries/{}", id)).await
    }

    pub async fn create_swot_entry(&self, entry: &SwotEntryPayload) -> Result<SwotEntry> {
        self.request(Method::POST, "/api/swot-entries", Some(entry))
            .await
    }

    pub async fn update_swot_entry(&self, id: Uuid, description: &str) -> Result<SwotEntry> {
        let body = json!({ "description": description });
        self.request(Method::PUT, &format!("/api/swot-entries/{}", id), Some(&body))
            .await
    }

    pub async fn delete_swot_entry(&self, id: Uuid) -> Result<String> {
        self.delete_record(&format!("/api/swot-entries/{}", id))
            .await
    }

    // ------------------------------------------------------------------
    // Goals
    // ------------------------------------------------------------------

    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.get("/api/goals").await
    }

    pub async fn list_goals_by_issue(&self, issue_id: Uuid) -> Result<Vec<Goal>> {
        self.get(&format!("/api/goals/issue/{}", issue_id)).await
    }

    pub async fn get_goal(&self, id: Uuid) -> Result<Goal> {
        self.get(&format!("/api/goals/{}", id)).await
    }

    pub async fn create_goal(&self, goal: &GoalPayload) -> Result<Goal> {
        self.request(Method::POST, "/api/goals", Some(goal)).await
    }

    pub async fn update_goal(&self, id: Uuid, updates: &GoalPayload) -> Result<Goal> {
        self.request(Method::PUT, &format!("/api/goals/{}", id), Some(updates))
            .await
    }

    pub async fn delete_goal(&self, id: Uuid) -> Result<String> {
        self.delete_record(&format!("/api/goals/{}", id)).await
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    pub async fn list_actions(&self) -> Result<Vec<Action>> {
        self.get("/api/actions").await
    }

    pub async fn list_actions_by_issue(&self, issue_id: Uuid) -> Result<Vec<PopulatedAction>> {
        self.get(&format!("/api/actions/issue/{}", issue_id)).await
    }

    pub async fn get_action(&self, id: Uuid) -> Result<Action> {
        self.get(&format!("/api/actions/{}", id)).await
    }

    pub async fn create_action(&self, action: &ActionPayload) -> Result<Action> {
        self.request(Method::POST, "/api/actions", Some(action)).await
    }

    pub async fn update_action(&self, id: Uuid, title: &str, description: &str) -> Result<Action> {
        let body = json!({ "title": title, "description": description });
        self.request(Method::PUT, &format!("/api/actions/{}", id), Some(&body))
            .await
    }

    pub async fn delete_action(&self, id: Uuid) -> Result<String> {
        self.delete_record(&format!("/api/actions/{}", id)).await
    }

    pub async fn attach_swot_entry(
        &self,
        action_id: Uuid,
        swot_entry_id: Uuid,
    ) -> Result<PopulatedAction> {
        let body = json!({ "swotEntryId": swot_entry_id });
        self.request(
            Method::POST,
            &format!("/api/actions/{}/swot-entries", action_id),
            Some(&body),
        )
        .await
    }

    pub async fn detach_swot_entry(
        &self,
        action_id: Uuid,
        swot_entry_id: Uuid,
    ) -> Result<PopulatedAction> {
        self.delete(&format!(
            "/api/actions/{}/swot-entries/{}",
            action_id, swot_entry_id
        ))
        .await
    }

    pub async fn get_action_detail(&self, id: Uuid) -> Result<String> {
        let body: DetailBody = self.get(&format!("/api/actions/{}/detail", id)).await?;
        Ok(body.detail)
    }

    pub async fn update_action_detail(&self, id: Uuid, detail: &str) -> Result<Action> {
        let body = json!({ "detail": detail });
        self.request(
            Method::PUT,
            &format!("/api/actions/{}/detail", id),
            Some(&body),
        )
        .await
    }

    pub async fn delete_action_detail(&self, id: Uuid) -> Result<Action> {
        self.delete(&format!("/api/actions/{}/detail", id)).await
    }

    // ------------------------------------------------------------------
    // Action/SWOT relations
    // ------------------------------------------------------------------

    pub async fn list_relations(&self) -> Result<Vec<ActionSwotRelation>> {
        self.get("/api/action-swot-relations").await
    }

    pub async fn list_relations_by_action(
        &self,
        action_id: Uuid,
    ) -> Result<Vec<ActionSwotRelation>> {
        self.get(&format!("/api/action-swot-relations/action/{}", action_id))
            .await
    }

    pub async fn list_relations_by_swot(&self, swot_id: Uuid) -> Result<Vec<ActionSwotRelation>> {
        self.get(&format!("/api/action-swot-relations/swot/{}", swot_id))
            .await
    }

    pub async fn get_relation(&self, id: Uuid) -> Result<ActionSwotRelation> {
        self.get(&format!("/api/action-swot-relations/{}", id))
            .await
    }

    pub async fn create_relation(&self, relation: &RelationPayload) -> Result<ActionSwotRelation> {
        self.request(Method::POST, "/api/action-swot-relations", Some(relation))
            .await
    }

    pub async fn update_relation_reasoning(
        &self,
        id: Uuid,
        reasoning: Option<&str>,
    ) -> Result<ActionSwotRelation> {
        let body = json!({ "reasoning": reasoning });
        self.request(
            Method::PUT,
            &format!("/api/action-swot-relations/{}", id),
            Some(&body),
        )
        .await
    }

    pub async fn delete_relation(&self, id: Uuid) -> Result<String> {
        self.delete_record(&format!("/api/action-swot-relations/{}", id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/issues"), "http://localhost:8080/api/issues");
    }
}
