//! Maintenance team model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use validator::Validate;

use super::RecordId;

/// Maintenance team record
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: RecordId,
    /// Unique (case-insensitive)
    pub name: String,
    #[serde(default)]
    pub specialization: String,
    /// Member user ids, no duplicates
    #[serde(default)]
    pub members: Vec<RecordId>,
    pub manager_id: Option<RecordId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Team {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    /// Insert with set semantics; returns false when already present
    pub fn add_member(&mut self, user_id: &str) -> bool {
        if self.has_member(user_id) {
            return false;
        }
        self.members.push(user_id.to_string());
        true
    }

    pub fn remove_member(&mut self, user_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != user_id);
        self.members.len() != before
    }
}

/// Create team request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeam {
    #[validate(length(min = 1, message = "Team name is required"))]
    pub name: String,
    pub specialization: Option<String>,
    /// Defaults to the creating manager
    pub manager_id: Option<RecordId>,
    #[serde(default)]
    pub members: Vec<RecordId>,
}

/// Update team request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeam {
    #[validate(length(min = 1, message = "Team name cannot be empty"))]
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub manager_id: Option<RecordId>,
}

/// Assign a technician to a team
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignMember {
    pub user_id: RecordId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_set_semantics() {
        let mut team = Team {
            id: "t1".to_string(),
            name: "Mechanics".to_string(),
            specialization: String::new(),
            members: vec!["u2".to_string()],
            manager_id: None,
            is_active: true,
            created_at: None,
        };
        assert!(!team.add_member("u2"));
        assert!(team.add_member("u5"));
        assert_eq!(team.members, vec!["u2", "u5"]);
        assert!(team.remove_member("u2"));
        assert!(!team.remove_member("u2"));
        assert_eq!(team.members, vec!["u5"]);
    }

    #[test]
    fn test_seed_shape_deserializes() {
        let team: Team = serde_json::from_str(r#"{"id":"t1","name":"Mechanics","members":["u2"]}"#).unwrap();
        assert!(team.is_active);
        assert_eq!(team.specialization, "");
        assert!(team.has_member("u2"));
    }
}
