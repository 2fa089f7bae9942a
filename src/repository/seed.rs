//! Demo dataset loaded into an empty store

use chrono::{Duration, NaiveDate, Utc};

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        Equipment, EquipmentStatus, MaintenanceRequest, RequestStage, RequestType, Team, User, UserRole,
    },
};

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "Demo123!";

pub struct DemoDataset {
    pub users: Vec<User>,
    pub teams: Vec<Team>,
    pub equipment: Vec<Equipment>,
    pub requests: Vec<MaintenanceRequest>,
}

fn user(id: &str, name: &str, email: &str, role: UserRole, team_id: Option<&str>, password_hash: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        team_id: team_id.map(str::to_string),
        is_admin: role == UserRole::Manager,
        department: None,
        is_active: true,
        created_at: Utc::now(),
        password_hash: Some(password_hash.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn equipment(
    id: &str,
    name: &str,
    serial: &str,
    category: &str,
    location: &str,
    department: &str,
    owner: Option<&str>,
    team: &str,
    purchased: (i32, u32, u32),
    warranty_months: u32,
    health: u8,
) -> Equipment {
    Equipment {
        id: id.to_string(),
        name: name.to_string(),
        serial_number: serial.to_string(),
        category: category.to_string(),
        location: location.to_string(),
        department: Some(department.to_string()),
        assigned_employee_id: owner.map(str::to_string),
        maintenance_team_id: team.to_string(),
        purchase_date: NaiveDate::from_ymd_opt(purchased.0, purchased.1, purchased.2),
        warranty_months,
        health,
        status: EquipmentStatus::Operational,
        is_active: true,
    }
}

/// Two teams, four accounts, three machines, two open requests
pub fn demo_dataset(password_hash: &str) -> DemoDataset {
    let now = Utc::now();

    let teams = vec![
        Team {
            id: "t1".to_string(),
            name: "Mechanics".to_string(),
            specialization: "Mechanical".to_string(),
            members: vec!["u2".to_string()],
            manager_id: Some("u1".to_string()),
            is_active: true,
            created_at: Some(now),
        },
        Team {
            id: "t2".to_string(),
            name: "IT Support".to_string(),
            specialization: "IT".to_string(),
            members: vec!["u4".to_string()],
            manager_id: Some("u1".to_string()),
            is_active: true,
            created_at: Some(now),
        },
    ];

    let users = vec![
        user("u1", "Alice Manager", "manager@gearguard.com", UserRole::Manager, None, password_hash),
        user("u2", "Bob Tech", "mechanic@gearguard.com", UserRole::Technician, Some("t1"), password_hash),
        user("u3", "Charlie Employee", "employee@gearguard.com", UserRole::Employee, None, password_hash),
        user("u4", "Dave IT", "it@gearguard.com", UserRole::Technician, Some("t2"), password_hash),
    ];

    let mut equipment = vec![
        equipment("e1", "CNC Machine 01", "CNC-9001", "Heavy Machinery", "Floor A", "Production", None, "t1", (2023, 1, 10), 24, 85),
        equipment("e2", "Office Printer X1", "PRT-2022", "Electronics", "Admin Block", "Administration", Some("u3"), "t2", (2024, 2, 15), 12, 95),
        equipment("e3", "Forklift MK2", "FL-550", "Transport", "Warehouse", "Logistics", None, "t1", (2022, 5, 20), 36, 25),
    ];
    // r2 is already being worked on
    equipment[1].status = EquipmentStatus::UnderRepair;

    let requests = vec![
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
            stage: RequestStage::New,
            scheduled_date: None,
            duration_hours: 2.0,
            created_at: now - Duration::days(1),
            completed_at: None,
            notes: None,
        },
        MaintenanceRequest {
            id: "r2".to_string(),
            subject: "Paper Jam".to_string(),
            description: "Persistent jam in tray 2".to_string(),
            request_type: RequestType::Corrective,
            equipment_id: Some("e2".to_string()),
            work_center: None,
            team_id: "t2".to_string(),
            created_by: "u3".to_string(),
            technician_id: Some("u4".to_string()),
            stage: RequestStage::InProgress,
            scheduled_date: Some(now),
            duration_hours: 4.0,
            created_at: now - Duration::days(2),
            completed_at: None,
            notes: None,
        },
    ];

    DemoDataset {
        users,
        teams,
        equipment,
        requests,
    }
}

impl Repository {
    /// Insert the dataset when every collection is empty. Returns whether
    /// anything was written.
    pub async fn seed_if_empty(&self, dataset: DemoDataset) -> AppResult<bool> {
        self.transact(|uow| {
            if !uow.is_empty() {
                return Ok(false);
            }
            dataset.users.into_iter().for_each(|u| uow.insert_user(u));
            dataset.teams.into_iter().for_each(|t| uow.insert_team(t));
            dataset.equipment.into_iter().for_each(|e| uow.insert_equipment(e));
            dataset.requests.into_iter().for_each(|r| uow.insert_request(r));
            Ok(true)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_only_into_empty_store() {
        let repo = Repository::in_memory();
        assert!(repo.seed_if_empty(demo_dataset("hash")).await.unwrap());
        assert!(!repo.seed_if_empty(demo_dataset("hash")).await.unwrap());

        let teams = repo.list::<Team>().await.unwrap();
        assert_eq!(teams.len(), 2);
        let e1 = repo.get::<Equipment>("e1").await.unwrap();
        assert_eq!(e1.maintenance_team_id, "t1");
        assert_eq!(e1.health, 85);
    }
}
