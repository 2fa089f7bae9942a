//! Maintenance request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    enums::{RequestStage, RequestType},
    RecordId,
};

/// Maintenance request record
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub id: RecordId,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    /// Target equipment; exclusive with `work_center`
    pub equipment_id: Option<RecordId>,
    /// Target work center label; exclusive with `equipment_id`
    pub work_center: Option<String>,
    pub team_id: RecordId,
    pub created_by: RecordId,
    pub technician_id: Option<RecordId>,
    pub stage: RequestStage,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration_hours: f64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl MaintenanceRequest {
    pub fn is_open(&self) -> bool {
        !self.stage.is_terminal()
    }

    /// Open for more than a day past its scheduled date, or its creation
    /// date when unscheduled
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if !self.is_open() {
            return false;
        }
        let reference = self.scheduled_date.unwrap_or(self.created_at);
        now > reference + chrono::Duration::hours(24)
    }

    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.subject.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// Create request. Any supplied stage is ignored: new requests start in New.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    pub equipment_id: Option<RecordId>,
    pub work_center: Option<String>,
    pub team_id: Option<RecordId>,
    pub technician_id: Option<RecordId>,
    pub stage: Option<RequestStage>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
    pub notes: Option<String>,
    /// Filled from the caller identity by the API layer
    #[serde(skip)]
    pub created_by: RecordId,
}

/// Update non-stage fields of a request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[validate(length(min = 1, message = "Subject cannot be empty"))]
    pub subject: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    pub technician_id: Option<RecordId>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
    pub notes: Option<String>,
}

/// Stage change request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStage {
    pub stage: RequestStage,
}

/// Accept request body; the technician defaults to the caller
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptRequest {
    pub technician_id: Option<RecordId>,
}

/// Request list filters
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestQuery {
    pub stage: Option<RequestStage>,
    pub team_id: Option<RecordId>,
    pub technician_id: Option<RecordId>,
    pub created_by: Option<RecordId>,
    pub equipment_id: Option<RecordId>,
    /// Case-insensitive search over subject and description
    pub q: Option<String>,
    /// Only New requests with no technician
    pub unassigned: Option<bool>,
}

impl RequestQuery {
    pub fn matches(&self, request: &MaintenanceRequest) -> bool {
        if self.stage.is_some_and(|s| s != request.stage) {
            return false;
        }
        if let Some(ref team_id) = self.team_id {
            if &request.team_id != team_id {
                return false;
            }
        }
        if let Some(ref technician_id) = self.technician_id {
            if request.technician_id.as_ref() != Some(technician_id) {
                return false;
            }
        }
        if let Some(ref created_by) = self.created_by {
            if &request.created_by != created_by {
                return false;
            }
        }
        if let Some(ref equipment_id) = self.equipment_id {
            if request.equipment_id.as_ref() != Some(equipment_id) {
                return false;
            }
        }
        if self.unassigned == Some(true)
            && (request.stage != RequestStage::New || request.technician_id.is_some())
        {
            return false;
        }
        match self.q {
            Some(ref q) if !q.is_empty() => request.matches_text(q),
            _ => true,
        }
    }
}

/// Calendar window query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CalendarQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub technician_id: Option<RecordId>,
}

/// One kanban column
#[derive(Debug, Serialize, ToSchema)]
pub struct KanbanColumn {
    pub stage: RequestStage,
    pub requests: Vec<MaintenanceRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(stage: RequestStage) -> MaintenanceRequest {
        MaintenanceRequest {
            id: "r1".to_string(),
            subject: "Oil Leak".to_string(),
            description: "Leaking oil from main valve".to_string(),
            request_type: RequestType::Corrective,
            equipment_id: Some("e1".to_string()),
            work_center: None,
            team_id: "t1".to_string(),
            created_by: "u3".to_string(),
            technician_id: None,
            stage,
            scheduled_date: None,
            duration_hours: 2.0,
            created_at: Utc::now() - Duration::hours(48),
            completed_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_overdue_only_when_open() {
        let now = Utc::now();
        assert!(request(RequestStage::New).is_overdue(now));
        assert!(!request(RequestStage::Repaired).is_overdue(now));

        let mut scheduled = request(RequestStage::InProgress);
        scheduled.scheduled_date = Some(now - Duration::hours(2));
        assert!(!scheduled.is_overdue(now));
    }

    #[test]
    fn test_query_filters() {
        let r = request(RequestStage::New);
        assert!(RequestQuery::default().matches(&r));
        assert!(RequestQuery { q: Some("VALVE".into()), ..Default::default() }.matches(&r));
        assert!(!RequestQuery { stage: Some(RequestStage::Scrap), ..Default::default() }.matches(&r));
        assert!(RequestQuery { unassigned: Some(true), ..Default::default() }.matches(&r));
        assert!(!RequestQuery { technician_id: Some("u2".into()), ..Default::default() }.matches(&r));
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(request(RequestStage::InProgress)).unwrap();
        assert_eq!(json["type"], "Corrective");
        assert_eq!(json["stage"], "In Progress");
        assert_eq!(json["equipmentId"], "e1");
        assert!(json.get("workCenter").is_none());
    }
}
