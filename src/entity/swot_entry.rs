use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_enum_value, Collection, Record, RecordBase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwotType {
    Strength,
    Weakness,
    Opportunity,
    Threat,
}

impl SwotType {
    /// Display order of the four quadrants.
    pub const ORDER: [SwotType; 4] = [
        SwotType::Strength,
        SwotType::Weakness,
        SwotType::Opportunity,
        SwotType::Threat,
    ];
}

impl std::fmt::Display for SwotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwotType::Strength => write!(f, "Strength"),
            SwotType::Weakness => write!(f, "Weakness"),
            SwotType::Opportunity => write!(f, "Opportunity"),
            SwotType::Threat => write!(f, "Threat"),
        }
    }
}

impl std::str::FromStr for SwotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_enum_value(s).as_str() {
            "strength" => Ok(SwotType::Strength),
            "weakness" => Ok(SwotType::Weakness),
            "opportunity" => Ok(SwotType::Opportunity),
            "threat" => Ok(SwotType::Threat),
            _ => Err(format!("Invalid SWOT type: {}", s)),
        }
    }
}

/// One Strength/Weakness/Opportunity/Threat statement under an issue.
///
/// Only `description` is mutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwotEntry {
    #[serde(flatten)]
    pub base: RecordBase,
    pub issue_id: Uuid,
    #[serde(rename = "type")]
    pub swot_type: SwotType,
    pub description: String,
    pub created_by: String,
}

impl SwotEntry {
    pub fn new(issue_id: Uuid, swot_type: SwotType, description: String, created_by: String) -> Self {
        Self {
            base: RecordBase::new(),
            issue_id,
            swot_type,
            description,
            created_by,
        }
    }
}

impl Record for SwotEntry {
    const COLLECTION: Collection = Collection::SwotEntries;
    const LABEL: &'static str = "SWOT entry";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_is_named_type() {
        let entry = SwotEntry::new(
            Uuid::new_v4(),
            SwotType::Opportunity,
            "New market".to_string(),
            "kim".to_string(),
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "Opportunity");
        assert_eq!(json["issueId"], entry.issue_id.to_string());
    }

    #[test]
    fn test_swot_type_round_trips_through_display() {
        for t in SwotType::ORDER {
            assert_eq!(t.to_string().parse::<SwotType>().unwrap(), t);
        }
    }
}
