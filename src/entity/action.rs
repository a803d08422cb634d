use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_enum_value, Collection, Record, RecordBase, SwotEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActionStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionStatus::Pending => write!(f, "Pending"),
            ActionStatus::InProgress => write!(f, "In Progress"),
            ActionStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_enum_value(s).as_str() {
            "pending" => Ok(ActionStatus::Pending),
            "inprogress" => Ok(ActionStatus::InProgress),
            "completed" => Ok(ActionStatus::Completed),
            _ => Err(format!("Invalid action status: {}", s)),
        }
    }
}

/// A remediation item under an issue, as stored: SWOT entries are held by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(flatten)]
    pub base: RecordBase,
    pub issue_id: Uuid,
    pub title: String,
    pub description: String,
    /// Rich text (HTML) body, empty when unset
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub status: ActionStatus,
    /// Ordered, duplicate-free list of linked SWOT entry ids
    #[serde(default)]
    pub swot_entries: Vec<Uuid>,
    pub created_by: String,
}

impl Action {
    pub fn new(issue_id: Uuid, title: String, description: String, created_by: String) -> Self {
        Self {
            base: RecordBase::new(),
            issue_id,
            title,
            description,
            detail: String::new(),
            status: ActionStatus::default(),
            swot_entries: Vec::new(),
            created_by,
        }
    }

    /// Link a SWOT entry. Returns false if it was already linked.
    pub fn attach_swot_entry(&mut self, swot_entry_id: Uuid) -> bool {
        if self.swot_entries.contains(&swot_entry_id) {
            return false;
        }
        self.swot_entries.push(swot_entry_id);
        true
    }

    /// Unlink a SWOT entry. Returns false if it was not linked.
    pub fn detach_swot_entry(&mut self, swot_entry_id: &Uuid) -> bool {
        let before = self.swot_entries.len();
        self.swot_entries.retain(|id| id != swot_entry_id);
        self.swot_entries.len() != before
    }

    /// Replace linked ids with the matching entries, keeping link order.
    /// Ids with no matching entry (deleted entries) are skipped.
    pub fn populate(self, entries: &[SwotEntry]) -> PopulatedAction {
        let swot_entries = self
            .swot_entries
            .iter()
            .filter_map(|id| entries.iter().find(|e| e.base.id == *id).cloned())
            .collect();

        PopulatedAction {
            base: self.base,
            issue_id: self.issue_id,
            title: self.title,
            description: self.description,
            detail: self.detail,
            status: self.status,
            swot_entries,
            created_by: self.created_by,
        }
    }
}

impl Record for Action {
    const COLLECTION: Collection = Collection::Actions;
    const LABEL: &'static str = "Action";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}

/// An action with its SWOT entries resolved to full documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedAction {
    #[serde(flatten)]
    pub base: RecordBase,
    pub issue_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(default)]
    pub swot_entries: Vec<SwotEntry>,
    pub created_by: String,
}

impl PopulatedAction {
    /// Collapse back to the stored shape.
    pub fn into_action(self) -> Action {
        Action {
            base: self.base,
            issue_id: self.issue_id,
            title: self.title,
            description: self.description,
            detail: self.detail,
            status: self.status,
            swot_entries: self.swot_entries.iter().map(|e| e.base.id).collect(),
            created_by: self.created_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SwotType;

    fn action() -> Action {
        Action::new(
            Uuid::new_v4(),
            "Launch referral program".to_string(),
            "Reward existing customers".to_string(),
            "lee".to_string(),
        )
    }

    fn entry(issue_id: Uuid, description: &str) -> SwotEntry {
        SwotEntry::new(
            issue_id,
            SwotType::Strength,
            description.to_string(),
            "lee".to_string(),
        )
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut action = action();
        let id = Uuid::new_v4();
        assert!(action.attach_swot_entry(id));
        assert!(!action.attach_swot_entry(id));
        assert_eq!(action.swot_entries, vec![id]);
    }

    #[test]
    fn test_detach_missing_is_noop() {
        let mut action = action();
        let kept = Uuid::new_v4();
        action.attach_swot_entry(kept);
        assert!(!action.detach_swot_entry(&Uuid::new_v4()));
        assert_eq!(action.swot_entries, vec![kept]);
        assert!(action.detach_swot_entry(&kept));
        assert!(action.swot_entries.is_empty());
    }

    #[test]
    fn test_populate_keeps_order_and_skips_dangling() {
        let mut action = action();
        let first = entry(action.issue_id, "Loyal base");
        let second = entry(action.issue_id, "Strong brand");
        action.attach_swot_entry(second.base.id);
        action.attach_swot_entry(Uuid::new_v4());
        action.attach_swot_entry(first.base.id);

        let populated = action.populate(&[first.clone(), second.clone()]);
        let ids: Vec<Uuid> = populated.swot_entries.iter().map(|e| e.base.id).collect();
        assert_eq!(ids, vec![second.base.id, first.base.id]);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = serde_json::json!({
            "_id": Uuid::new_v4(),
            "issueId": Uuid::new_v4(),
            "title": "t",
            "description": "d",
            "createdBy": "me",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        });
        let action: Action = serde_json::from_value(json).unwrap();
        assert_eq!(action.detail, "");
        assert_eq!(action.status, ActionStatus::Pending);
        assert!(action.swot_entries.is_empty());
    }
}
