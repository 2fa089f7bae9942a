//! Equipment model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{enums::EquipmentStatus, RecordId};

/// Health below this percentage marks equipment as critical
pub const CRITICAL_HEALTH: u8 = 30;

/// Equipment record
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: RecordId,
    pub name: String,
    pub serial_number: String,
    pub category: String,
    /// Physical location, doubles as work center label
    pub location: String,
    pub department: Option<String>,
    /// Owning employee
    pub assigned_employee_id: Option<RecordId>,
    pub maintenance_team_id: RecordId,
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub warranty_months: u32,
    /// Condition percentage, 0..=100
    pub health: u8,
    #[serde(default)]
    pub status: EquipmentStatus,
    pub is_active: bool,
}

impl Equipment {
    pub fn is_critical(&self) -> bool {
        self.is_active && self.health < CRITICAL_HEALTH
    }

    pub fn is_scrapped(&self) -> bool {
        self.status == EquipmentStatus::Scrapped
    }
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Equipment name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub department: Option<String>,
    pub assigned_employee_id: Option<RecordId>,
    pub maintenance_team_id: RecordId,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_months: Option<u32>,
    /// Defaults to 100
    #[validate(range(min = 0, max = 100, message = "Health must be between 0 and 100"))]
    pub health: Option<i32>,
}

/// Update equipment request (manual edit)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    #[validate(length(min = 1, message = "Equipment name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Serial number cannot be empty"))]
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub assigned_employee_id: Option<RecordId>,
    pub maintenance_team_id: Option<RecordId>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_months: Option<u32>,
    #[validate(range(min = 0, max = 100, message = "Health must be between 0 and 100"))]
    pub health: Option<i32>,
    pub status: Option<EquipmentStatus>,
    pub is_active: Option<bool>,
}

/// Equipment list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentQuery {
    /// Only operational (non-scrapped) items
    pub active: Option<bool>,
    pub team_id: Option<RecordId>,
    pub location: Option<String>,
    /// Case-insensitive department match
    pub department: Option<String>,
    /// Items owned by one employee
    pub assigned_employee_id: Option<RecordId>,
}

/// Equipment with its open request count
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDetails {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub open_requests: usize,
}
