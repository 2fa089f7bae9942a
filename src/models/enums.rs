//! Enumerations shared by the record types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    Employee,
    Technician,
    Manager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "Employee",
            UserRole::Technician => "Technician",
            UserRole::Manager => "Manager",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "employee" => Ok(UserRole::Employee),
            "technician" => Ok(UserRole::Technician),
            "manager" => Ok(UserRole::Manager),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Lifecycle stage of a maintenance request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RequestStage {
    New,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Repaired,
    Scrap,
}

impl RequestStage {
    /// Stages shown as kanban columns, in board order
    pub const ALL: [RequestStage; 4] = [
        RequestStage::New,
        RequestStage::InProgress,
        RequestStage::Repaired,
        RequestStage::Scrap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStage::New => "New",
            RequestStage::InProgress => "In Progress",
            RequestStage::Repaired => "Repaired",
            RequestStage::Scrap => "Scrap",
        }
    }

    /// Repaired and Scrap close a request
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStage::Repaired | RequestStage::Scrap)
    }

    /// Equipment status implied by entering this stage, if any
    pub fn equipment_effect(&self) -> Option<EquipmentStatus> {
        match self {
            RequestStage::New => None,
            RequestStage::InProgress => Some(EquipmentStatus::UnderRepair),
            RequestStage::Repaired => Some(EquipmentStatus::Operational),
            RequestStage::Scrap => Some(EquipmentStatus::Scrapped),
        }
    }
}

impl std::fmt::Display for RequestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reactive repair or scheduled upkeep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RequestType {
    Corrective,
    Preventive,
}

/// Operational status of an equipment item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum EquipmentStatus {
    #[default]
    Operational,
    #[serde(rename = "Under Repair", alias = "UnderRepair")]
    UnderRepair,
    Scrapped,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Operational => "Operational",
            EquipmentStatus::UnderRepair => "Under Repair",
            EquipmentStatus::Scrapped => "Scrapped",
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
