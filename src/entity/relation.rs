use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Collection, Record, RecordBase};

/// Annotated link between an action and a SWOT entry.
///
/// Independent of `Action::swot_entries`: creating a relation does not touch
/// the action, and the same pair may be related more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSwotRelation {
    #[serde(flatten)]
    pub base: RecordBase,
    /// Action the relation starts from
    pub action_id: Uuid,
    /// SWOT entry the action addresses
    pub swot_id: Uuid,
    /// Free-text justification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ActionSwotRelation {
    pub fn new(action_id: Uuid, swot_id: Uuid, reasoning: Option<String>) -> Self {
        Self {
            base: RecordBase::new(),
            action_id,
            swot_id,
            reasoning,
        }
    }
}

impl Record for ActionSwotRelation {
    const COLLECTION: Collection = Collection::ActionSwotRelations;
    const LABEL: &'static str = "Relation";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}
