//! Data models for GearGuard

pub mod enums;
pub mod equipment;
pub mod request;
pub mod team;
pub mod user;

/// Opaque record identifier (UUID string for generated records)
pub type RecordId = String;

/// Generate a fresh record identifier
pub fn new_id() -> RecordId {
    uuid::Uuid::new_v4().to_string()
}

// Re-export commonly used types
pub use enums::{EquipmentStatus, RequestStage, RequestType, UserRole};
pub use equipment::Equipment;
pub use request::MaintenanceRequest;
pub use team::Team;
pub use user::{User, UserClaims, UserView};
