//! Equipment lookups on Repository

use std::collections::BTreeSet;

use super::Repository;
use crate::{
    error::AppResult,
    models::{equipment::EquipmentQuery, Equipment},
};

impl Repository {
    /// List equipment matching the filters, ordered by name
    pub async fn equipment_search(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let mut rows: Vec<Equipment> = self
            .list::<Equipment>()
            .await?
            .into_iter()
            .filter(|e| query.active.map_or(true, |active| e.is_active == active))
            .filter(|e| match query.team_id {
                Some(ref team_id) => &e.maintenance_team_id == team_id,
                None => true,
            })
            .filter(|e| match query.location {
                Some(ref location) => &e.location == location,
                None => true,
            })
            .filter(|e| match query.department {
                Some(ref department) => e
                    .department
                    .as_deref()
                    .is_some_and(|d| d.eq_ignore_ascii_case(department.trim())),
                None => true,
            })
            .filter(|e| match query.assigned_employee_id {
                Some(ref employee_id) => e.assigned_employee_id.as_ref() == Some(employee_id),
                None => true,
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    /// Distinct locations of active equipment, usable as work centers
    pub async fn equipment_work_centers(&self) -> AppResult<Vec<String>> {
        let centers: BTreeSet<String> = self
            .list::<Equipment>()
            .await?
            .into_iter()
            .filter(|e| e.is_active)
            .map(|e| e.location)
            .collect();
        Ok(centers.into_iter().collect())
    }
}
