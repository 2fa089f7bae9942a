//! Equipment service

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, EquipmentDetails, EquipmentQuery, UpdateEquipment},
        new_id,
        request::RequestQuery,
        Equipment, EquipmentStatus, MaintenanceRequest,
    },
    repository::{Repository, UnitOfWork},
    services::required_text,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

fn check_team(uow: &UnitOfWork, team_id: &str) -> AppResult<()> {
    match uow.find_team(team_id) {
        Some(team) if team.is_active => Ok(()),
        Some(team) => Err(AppError::Validation(format!("Team {} is deactivated", team.name))),
        None => Err(AppError::Validation(format!("Unknown maintenance team {}", team_id))),
    }
}

/// Trim an optional replacement for a required field
fn replacement(value: Option<&str>, field: &str) -> AppResult<Option<String>> {
    value.map(|v| required_text(v, field)).transpose()
}

fn check_employee(uow: &UnitOfWork, user_id: &str) -> AppResult<()> {
    uow.find_user(user_id)
        .map(|_| ())
        .ok_or_else(|| AppError::Validation(format!("Unknown employee {}", user_id)))
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new equipment item. It starts active and Operational.
    pub async fn create(&self, data: CreateEquipment) -> AppResult<Equipment> {
        validator::Validate::validate(&data)?;
        let name = required_text(&data.name, "Equipment name")?;
        let serial_number = required_text(&data.serial_number, "Serial number")?;
        let category = required_text(&data.category, "Category")?;
        let location = required_text(&data.location, "Location")?;

        let equipment = self
            .repository
            .transact(|uow| {
                check_team(uow, &data.maintenance_team_id)?;
                if let Some(ref employee_id) = data.assigned_employee_id {
                    check_employee(uow, employee_id)?;
                }

                let equipment = Equipment {
                    id: new_id(),
                    name,
                    serial_number,
                    category,
                    location,
                    department: data.department,
                    assigned_employee_id: data.assigned_employee_id,
                    maintenance_team_id: data.maintenance_team_id,
                    purchase_date: data.purchase_date,
                    warranty_months: data.warranty_months.unwrap_or(0),
                    // range checked by validation above
                    health: data.health.unwrap_or(100) as u8,
                    status: EquipmentStatus::Operational,
                    is_active: true,
                };
                uow.insert_equipment(equipment.clone());
                Ok(equipment)
            })
            .await?;

        tracing::info!(
            equipment_id = %equipment.id,
            serial = %equipment.serial_number,
            "Equipment registered"
        );
        Ok(equipment)
    }

    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        self.repository.equipment_search(query).await
    }

    /// Get one item with its count of open requests
    pub async fn get(&self, id: &str) -> AppResult<EquipmentDetails> {
        let equipment = self.repository.get::<Equipment>(id).await?;
        let open_requests = self
            .requests_for(id)
            .await?
            .iter()
            .filter(|r| r.is_open())
            .count();
        Ok(EquipmentDetails {
            equipment,
            open_requests,
        })
    }

    /// Manual edit. Unlike lifecycle side effects this may change any
    /// status, including Scrapped.
    pub async fn update(&self, id: &str, data: UpdateEquipment) -> AppResult<Equipment> {
        validator::Validate::validate(&data)?;
        let name = replacement(data.name.as_deref(), "Equipment name")?;
        let serial_number = replacement(data.serial_number.as_deref(), "Serial number")?;
        let category = replacement(data.category.as_deref(), "Category")?;
        let location = replacement(data.location.as_deref(), "Location")?;

        self.repository
            .transact(|uow| {
                if let Some(ref team_id) = data.maintenance_team_id {
                    check_team(uow, team_id)?;
                }
                if let Some(ref employee_id) = data.assigned_employee_id {
                    check_employee(uow, employee_id)?;
                }

                let equipment = uow.equipment_mut(id)?;
                if let Some(name) = name {
                    equipment.name = name;
                }
                if let Some(serial_number) = serial_number {
                    equipment.serial_number = serial_number;
                }
                if let Some(category) = category {
                    equipment.category = category;
                }
                if let Some(location) = location {
                    equipment.location = location;
                }
                if let Some(department) = data.department {
                    equipment.department = Some(department);
                }
                if let Some(employee_id) = data.assigned_employee_id {
                    equipment.assigned_employee_id = Some(employee_id);
                }
                if let Some(team_id) = data.maintenance_team_id {
                    equipment.maintenance_team_id = team_id;
                }
                if let Some(purchase_date) = data.purchase_date {
                    equipment.purchase_date = Some(purchase_date);
                }
                if let Some(months) = data.warranty_months {
                    equipment.warranty_months = months;
                }
                if let Some(health) = data.health {
                    equipment.health = health as u8;
                }
                if let Some(status) = data.status {
                    equipment.status = status;
                }
                if let Some(is_active) = data.is_active {
                    equipment.is_active = is_active;
                }
                Ok(equipment.clone())
            })
            .await
    }

    /// Maintenance history of one item, newest first
    pub async fn requests_for(&self, id: &str) -> AppResult<Vec<MaintenanceRequest>> {
        self.repository
            .requests_search(&RequestQuery {
                equipment_id: Some(id.to_string()),
                ..Default::default()
            })
            .await
    }

    pub async fn work_centers(&self) -> AppResult<Vec<String>> {
        self.repository.equipment_work_centers().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::seeded_services;

    fn press() -> CreateEquipment {
        CreateEquipment {
            name: "Hydraulic Press".to_string(),
            serial_number: "HP-100".to_string(),
            category: "Heavy Machinery".to_string(),
            location: "Floor B".to_string(),
            department: None,
            assigned_employee_id: None,
            maintenance_team_id: "t1".to_string(),
            purchase_date: None,
            warranty_months: Some(12),
            health: None,
        }
    }

    #[tokio::test]
    async fn test_register_defaults() {
        let services = seeded_services().await;
        let created = services.equipment.create(press()).await.unwrap();
        assert!(created.is_active);
        assert_eq!(created.status, EquipmentStatus::Operational);
        assert_eq!(created.health, 100);

        let centers = services.equipment.work_centers().await.unwrap();
        assert!(centers.contains(&"Floor B".to_string()));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let services = seeded_services().await;

        let mut unhealthy = press();
        unhealthy.health = Some(101);
        let err = services.equipment.create(unhealthy).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut unnamed = press();
        unnamed.name = String::new();
        assert!(services.equipment.create(unnamed).await.is_err());

        let mut blank_serial = press();
        blank_serial.serial_number = " \t ".to_string();
        let err = services.equipment.create(blank_serial).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut blank_location = press();
        blank_location.location = "   ".to_string();
        let err = services.equipment.create(blank_location).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let blank_edit = UpdateEquipment {
            category: Some(" ".to_string()),
            ..Default::default()
        };
        let err = services.equipment.update("e1", blank_edit).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(services.equipment.get("e1").await.unwrap().equipment.category, "Heavy Machinery");

        let mut orphan = press();
        orphan.maintenance_team_id = "t9".to_string();
        let err = services.equipment.create(orphan).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_by_department_and_owner() {
        let services = seeded_services().await;
        let ids = |rows: Vec<Equipment>| rows.into_iter().map(|e| e.id).collect::<Vec<_>>();

        let production = services
            .equipment
            .list(&EquipmentQuery {
                department: Some("production".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ids(production), vec!["e1"]);

        let owned = services
            .equipment
            .list(&EquipmentQuery {
                assigned_employee_id: Some("u3".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ids(owned), vec!["e2"]);

        let nobody = services
            .equipment
            .list(&EquipmentQuery {
                department: Some("Logistics".to_string()),
                assigned_employee_id: Some("u3".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_details_count_open_requests() {
        let services = seeded_services().await;
        let details = services.equipment.get("e1").await.unwrap();
        assert_eq!(details.open_requests, 1);

        services
            .requests
            .set_stage("r1", crate::models::RequestStage::Repaired)
            .await
            .unwrap();
        assert_eq!(services.equipment.get("e1").await.unwrap().open_requests, 0);
        assert_eq!(services.equipment.requests_for("e1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_manual_edit_can_restore_scrapped() {
        let services = seeded_services().await;
        services
            .requests
            .set_stage("r1", crate::models::RequestStage::Scrap)
            .await
            .unwrap();

        let restored = services
            .equipment
            .update(
                "e1",
                UpdateEquipment {
                    status: Some(EquipmentStatus::Operational),
                    is_active: Some(true),
                    health: Some(40),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(restored.status, EquipmentStatus::Operational);
        assert!(restored.is_active);
        assert_eq!(restored.health, 40);
    }
}
