//! Store wiring and the derived views the board renders.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subscription::{StoreEvent, SubscriptionId};
use super::{ActionStore, ApiClient, GoalStore, IssueStore, SwotStore, UiStore};
use crate::entity::{Action, SwotEntry, SwotType};
use crate::error::{Result, SwotError};

/// Data carried by a SWOT card while it is dragged onto an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub swot_type: SwotType,
    pub description: String,
}

impl DragPayload {
    /// MIME type the payload travels under.
    pub const MIME_TYPE: &'static str = "application/json";

    pub fn for_entry(entry: &SwotEntry) -> Self {
        Self {
            id: entry.base.id,
            swot_type: entry.swot_type,
            description: entry.description.clone(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| SwotError::InvalidDragPayload(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Linked entries of one SWOT type.
#[derive(Debug, Clone, PartialEq)]
pub struct SwotGroup {
    pub swot_type: SwotType,
    pub entries: Vec<SwotEntry>,
}

/// An action joined with the SWOT entries it links.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionView {
    pub action: Action,
    /// Groups in Strength, Weakness, Opportunity, Threat order; empty
    /// groups are left out.
    pub groups: Vec<SwotGroup>,
}

impl ActionView {
    fn join(action: Action, entries: &[SwotEntry]) -> Self {
        let linked: Vec<&SwotEntry> = action
            .swot_entries
            .iter()
            .filter_map(|id| entries.iter().find(|e| e.base.id == *id))
            .collect();

        let groups = SwotType::ORDER
            .iter()
            .filter_map(|t| {
                let entries: Vec<SwotEntry> = linked
                    .iter()
                    .filter(|e| e.swot_type == *t)
                    .map(|e| (*e).clone())
                    .collect();
                (!entries.is_empty()).then_some(SwotGroup {
                    swot_type: *t,
                    entries,
                })
            })
            .collect();

        Self { action, groups }
    }

    pub fn swot_entry_ids(&self) -> Vec<Uuid> {
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter().map(|e| e.base.id))
            .collect()
    }
}

/// Every store the board needs, built around one API client.
///
/// Cloning shares the stores.
#[derive(Clone)]
pub struct StoreContext {
    pub api: ApiClient,
    pub issues: Arc<IssueStore>,
    pub swot: Arc<SwotStore>,
    pub goals: Arc<GoalStore>,
    pub actions: Arc<ActionStore>,
    pub ui: Arc<UiStore>,
    swot_link: SubscriptionId,
}

impl StoreContext {
    pub fn new(api: ApiClient) -> Self {
        let issues = Arc::new(IssueStore::new(api.clone()));
        let swot = Arc::new(SwotStore::new(api.clone()));
        let goals = Arc::new(GoalStore::new(api.clone()));
        let actions = Arc::new(ActionStore::new(api.clone()));
        let ui = Arc::new(UiStore::new());

        let linked = Arc::clone(&actions);
        let swot_link = swot.events().subscribe(move |event| match event {
            StoreEvent::Deleted(id) => linked.remove_deleted_swot_entry(*id),
            StoreEvent::Updated(entry) => linked.update_swot_entry_in_actions(entry),
            StoreEvent::Loaded | StoreEvent::Created(_) => {}
        });

        Self {
            api,
            issues,
            swot,
            goals,
            actions,
            ui,
            swot_link,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ApiClient::from_env())
    }

    /// Subscription that keeps the action store in step with SWOT edits.
    pub fn swot_link(&self) -> &str {
        &self.swot_link
    }

    /// Load everything shown on an issue's board.
    pub async fn load_issue(&self, issue_id: Uuid) -> Result<()> {
        self.issues.fetch_issue(issue_id).await?;
        self.swot.fetch_swot_entries(issue_id).await?;
        self.goals.fetch_goals(issue_id).await?;
        self.actions.fetch_actions(issue_id).await
    }

    pub fn action_view(&self, action_id: &Uuid) -> Option<ActionView> {
        let action = self.actions.get(action_id)?;
        Some(ActionView::join(action, &self.swot.entries()))
    }

    pub fn action_views(&self) -> Vec<ActionView> {
        let entries = self.swot.entries();
        self.actions
            .actions()
            .into_iter()
            .map(|a| ActionView::join(a, &entries))
            .collect()
    }

    /// Attach the dragged SWOT entry to the action it was dropped on.
    pub async fn drop_swot_entry_on_action(&self, action_id: Uuid, drag_data: &str) -> Result<()> {
        let payload = DragPayload::parse(drag_data)?;
        tracing::debug!(%action_id, swot_entry_id = %payload.id, swot_type = %payload.swot_type, "SWOT entry dropped");
        self.actions
            .add_swot_entry_to_action(action_id, payload.id)
            .await
    }

    /// Hover an action (or nothing) and highlight the entries it links.
    pub fn hover_action(&self, action_id: Option<Uuid>) {
        let linked = action_id
            .and_then(|id| self.actions.get(&id))
            .map(|a| a.swot_entries)
            .unwrap_or_default();
        self.ui.set_hovered_action(action_id, &linked);
    }

    pub fn hover_swot_entry(&self, swot_entry_id: Option<Uuid>) {
        self.ui.set_hovered_swot_entry(swot_entry_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(swot_type: SwotType, description: &str) -> SwotEntry {
        SwotEntry::new(Uuid::nil(), swot_type, description.into(), "kim".into())
    }

    #[test]
    fn test_join_groups_in_fixed_order() {
        let threat = entry(SwotType::Threat, "new competitor");
        let strength = entry(SwotType::Strength, "brand");
        let strength2 = entry(SwotType::Strength, "team");
        let unlinked = entry(SwotType::Weakness, "cost");

        let mut action = Action::new(Uuid::nil(), "t".into(), "d".into(), "kim".into());
        action.attach_swot_entry(threat.base.id);
        action.attach_swot_entry(strength2.base.id);
        action.attach_swot_entry(Uuid::new_v4());
        action.attach_swot_entry(strength.base.id);

        let view = ActionView::join(
            action,
            &[threat.clone(), strength.clone(), strength2.clone(), unlinked],
        );
        let types: Vec<SwotType> = view.groups.iter().map(|g| g.swot_type).collect();
        assert_eq!(types, vec![SwotType::Strength, SwotType::Threat]);
        assert_eq!(view.groups[0].entries, vec![strength2, strength]);
        assert_eq!(view.groups[1].entries, vec![threat]);
    }

    #[test]
    fn test_drag_payload_parse() {
        let source = entry(SwotType::Opportunity, "new market");
        let raw = DragPayload::for_entry(&source).to_json().unwrap();
        assert!(raw.contains("\"type\":\"Opportunity\""));
        assert_eq!(DragPayload::parse(&raw).unwrap().id, source.base.id);

        assert!(matches!(
            DragPayload::parse("not json"),
            Err(SwotError::InvalidDragPayload(_))
        ));
        assert!(DragPayload::parse(r#"{"id":"x","type":"Strength","description":""}"#).is_err());
    }
}
