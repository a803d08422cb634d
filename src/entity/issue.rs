use serde::{Deserialize, Serialize};

use super::{normalize_enum_value, Collection, Record, RecordBase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IssueStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueStatus::Open => write!(f, "Open"),
            IssueStatus::InProgress => write!(f, "In Progress"),
            IssueStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_enum_value(s).as_str() {
            "open" => Ok(IssueStatus::Open),
            "inprogress" => Ok(IssueStatus::InProgress),
            "resolved" => Ok(IssueStatus::Resolved),
            _ => Err(format!("Invalid issue status: {}", s)),
        }
    }
}

/// Top-level analysis subject. Owns SWOT entries, goals and actions by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(flatten)]
    pub base: RecordBase,
    pub title: String,
    pub description: String,
    pub created_by: String,
    #[serde(default)]
    pub status: IssueStatus,
}

impl Issue {
    pub fn new(title: String, description: String, created_by: String) -> Self {
        Self {
            base: RecordBase::new(),
            title,
            description,
            created_by,
            status: IssueStatus::default(),
        }
    }
}

impl Record for Issue {
    const COLLECTION: Collection = Collection::Issues;
    const LABEL: &'static str = "Issue";

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
    fn test_status_wire_format() {
        let json = serde_json::to_string(&IssueStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: IssueStatus = serde_json::from_str("\"Resolved\"").unwrap();
        assert_eq!(parsed, IssueStatus::Resolved);
        assert!(serde_json::from_str::<IssueStatus>("\"Closed\"").is_err());
    }

    #[test]
    fn test_status_from_str_is_lenient() {
        assert_eq!("in_progress".parse::<IssueStatus>().unwrap(), IssueStatus::InProgress);
        assert_eq!("OPEN".parse::<IssueStatus>().unwrap(), IssueStatus::Open);
        assert!("done".parse::<IssueStatus>().is_err());
    }

    #[test]
    fn test_issue_defaults_to_open() {
        let json = serde_json::json!({
            "_id": uuid::Uuid::new_v4(),
            "title": "Churn",
            "description": "Customers leave",
            "createdBy": "sam",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        });
        let issue: Issue = serde_json::from_value(json).unwrap();
        assert_eq!(issue.status, IssueStatus::Open);
        assert_eq!(issue.created_by, "sam");
    }
}
