//! Dashboard and report aggregates

use chrono::{DateTime, Utc};

use crate::{
    api::stats::{DashboardStats, ReportStats, StatEntry},
    error::AppResult,
    models::{Equipment, MaintenanceRequest, RequestStage, Team, User, UserRole},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

/// Percentage of technicians with a request scheduled on the same calendar
/// day as `now`
fn technician_utilization(users: &[User], requests: &[MaintenanceRequest], now: DateTime<Utc>) -> u8 {
    let technicians: Vec<&User> = users.iter().filter(|u| u.role == UserRole::Technician).collect();
    if technicians.is_empty() {
        return 0;
    }
    let today = now.date_naive();
    let booked = technicians
        .iter()
        .filter(|tech| {
            requests.iter().any(|r| {
                r.technician_id.as_deref() == Some(tech.id.as_str())
                    && r.scheduled_date.is_some_and(|d| d.date_naive() == today)
            })
        })
        .count();
    ((booked as f64 / technicians.len() as f64) * 100.0).round() as u8
}

fn count(n: usize) -> i64 {
    n as i64
}

/// Aggregate the dashboard for one caller
pub fn dashboard(
    caller: &User,
    users: &[User],
    equipment: &[Equipment],
    requests: &[MaintenanceRequest],
    now: DateTime<Utc>,
) -> DashboardStats {
    let requests_by_stage = RequestStage::ALL
        .iter()
        .map(|stage| StatEntry {
            label: stage.to_string(),
            value: count(requests.iter().filter(|r| r.stage == *stage).count()),
        })
        .collect();

    DashboardStats {
        critical_equipment: count(equipment.iter().filter(|e| e.is_critical()).count()),
        active_equipment: count(equipment.iter().filter(|e| e.is_active).count()),
        open_requests: count(requests.iter().filter(|r| r.is_open()).count()),
        overdue_requests: count(requests.iter().filter(|r| r.is_overdue(now)).count()),
        technician_utilization: technician_utilization(users, requests, now),
        requests_by_stage,
        my_open_requests: count(
            requests
                .iter()
                .filter(|r| r.created_by == caller.id && r.is_open())
                .count(),
        ),
        my_tasks: count(
            requests
                .iter()
                .filter(|r| r.technician_id.as_deref() == Some(caller.id.as_str()) && r.is_open())
                .count(),
        ),
        available_requests: count(
            requests
                .iter()
                .filter(|r| {
                    r.stage == RequestStage::New
                        && r.technician_id.is_none()
                        && caller.team_id.as_deref() == Some(r.team_id.as_str())
                })
                .count(),
        ),
    }
}

/// Request counts per team and per equipment category
pub fn report(teams: &[Team], equipment: &[Equipment], requests: &[MaintenanceRequest]) -> ReportStats {
    let by_team = teams
        .iter()
        .map(|team| StatEntry {
            label: team.name.clone(),
            value: count(requests.iter().filter(|r| r.team_id == team.id).count()),
        })
        .collect();

    let mut categories: Vec<&str> = equipment.iter().map(|e| e.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();

    let by_category = categories
        .into_iter()
        .map(|category| StatEntry {
            label: category.to_string(),
            value: count(
                requests
                    .iter()
                    .filter(|r| {
                        r.equipment_id.as_deref().is_some_and(|id| {
                            equipment.iter().any(|e| e.id == id && e.category == category)
                        })
                    })
                    .count(),
            ),
        })
        .collect();

    ReportStats {
        total_requests: count(requests.len()),
        requests_by_team: by_team,
        requests_by_category: by_category,
    }
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn dashboard(&self, caller_id: &str) -> AppResult<DashboardStats> {
        let users = self.repository.list::<User>().await?;
        let caller = users
            .iter()
            .find(|u| u.id == caller_id)
            .cloned()
            .ok_or_else(|| crate::repository::not_found::<User>(caller_id))?;
        let equipment = self.repository.list::<Equipment>().await?;
        let requests = self.repository.list::<MaintenanceRequest>().await?;

        Ok(dashboard(&caller, &users, &equipment, &requests, Utc::now()))
    }

    pub async fn report(&self) -> AppResult<ReportStats> {
        let teams = self.repository.list::<Team>().await?;
        let equipment = self.repository.list::<Equipment>().await?;
        let requests = self.repository.list::<MaintenanceRequest>().await?;

        Ok(report(&teams, &equipment, &requests))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::seed::demo_dataset;

    #[test]
    fn test_dashboard_on_demo_data() {
        let data = demo_dataset("hash");
        let now = Utc::now() + chrono::Duration::minutes(1);
        let manager = data.users[0].clone();

        let stats = dashboard(&manager, &data.users, &data.equipment, &data.requests, now);
        // forklift at 25% health
        assert_eq!(stats.critical_equipment, 1);
        assert_eq!(stats.active_equipment, 3);
        assert_eq!(stats.open_requests, 2);
        // r1 and r2 were created more than a day ago; r2 is scheduled now
        assert_eq!(stats.overdue_requests, 1);
        // u4 has r2 scheduled today, u2 has nothing
        assert_eq!(stats.technician_utilization, 50);
        assert_eq!(stats.requests_by_stage[0].value, 1);
        assert_eq!(stats.requests_by_stage[1].value, 1);

        let mechanic = data.users[1].clone();
        let stats = dashboard(&mechanic, &data.users, &data.equipment, &data.requests, now);
        assert_eq!(stats.available_requests, 1);
        assert_eq!(stats.my_tasks, 0);

        let reporter = data.users[2].clone();
        let stats = dashboard(&reporter, &data.users, &data.equipment, &data.requests, now);
        assert_eq!(stats.my_open_requests, 2);
    }

    #[test]
    fn test_utilization_without_technicians() {
        assert_eq!(technician_utilization(&[], &[], Utc::now()), 0);
    }

    #[test]
    fn test_report_groups() {
        let data = demo_dataset("hash");
        let grouped = report(&data.teams, &data.equipment, &data.requests);
        assert_eq!(grouped.total_requests, 2);
        assert_eq!(grouped.requests_by_team[0].label, "Mechanics");
        assert_eq!(grouped.requests_by_team[0].value, 1);
        let electronics = grouped
            .requests_by_category
            .iter()
            .find(|e| e.label == "Electronics")
            .unwrap();
        assert_eq!(electronics.value, 1);
        assert_eq!(grouped.requests_by_category.len(), 3);
    }
}
