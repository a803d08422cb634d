mod action;
mod goal;
mod issue;
mod relation;
mod swot_entry;

pub use action::{Action, ActionStatus, PopulatedAction};
pub use goal::{Goal, GoalType};
pub use issue::{Issue, IssueStatus};
pub use relation::ActionSwotRelation;
pub use swot_entry::{SwotEntry, SwotType};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The document collections backing the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Issues,
    SwotEntries,
    Goals,
    Actions,
    ActionSwotRelations,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Issues,
        Collection::SwotEntries,
        Collection::Goals,
        Collection::Actions,
        Collection::ActionSwotRelations,
    ];

    /// Collection name as it appears in the document database.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Issues => "issues",
            Collection::SwotEntries => "swotentries",
            Collection::Goals => "goals",
            Collection::Actions => "actions",
            Collection::ActionSwotRelations => "actionswotrelations",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity and timestamps shared by every stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBase {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordBase {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`; called on every write.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for RecordBase {
    fn default() -> Self {
        Self::new()
    }
}

/// A document type stored in one collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Human name used in API messages ("Issue not found").
    const LABEL: &'static str;

    fn base(&self) -> &RecordBase;

    fn base_mut(&mut self) -> &mut RecordBase;

    fn id(&self) -> Uuid {
        self.base().id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.base().created_at
    }
}

/// Normalise a user supplied enum value for lenient parsing.
pub(crate) fn normalize_enum_value(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect()
}
