use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_enum_value, Collection, Record, RecordBase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalType {
    #[serde(rename = "Short-term")]
    ShortTerm,
    #[serde(rename = "Long-term")]
    LongTerm,
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalType::ShortTerm => write!(f, "Short-term"),
            GoalType::LongTerm => write!(f, "Long-term"),
        }
    }
}

impl std::str::FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_enum_value(s).as_str() {
            "shortterm" => Ok(GoalType::ShortTerm),
            "longterm" => Ok(GoalType::LongTerm),
            _ => Err(format!("Invalid goal type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(flatten)]
    pub base: RecordBase,
    pub issue_id: Uuid,
    pub description: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub created_by: String,
}

impl Goal {
    pub fn new(issue_id: Uuid, description: String, goal_type: GoalType, created_by: String) -> Self {
        Self {
            base: RecordBase::new(),
            issue_id,
            description,
            goal_type,
            created_by,
        }
    }
}

impl Record for Goal {
    const COLLECTION: Collection = Collection::Goals;
    const LABEL: &'static str = "Goal";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}
