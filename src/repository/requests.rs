//! Maintenance request lookups on Repository

use chrono::{DateTime, Utc};

use super::Repository;
use crate::{
    error::AppResult,
    models::{request::RequestQuery, MaintenanceRequest},
};

impl Repository {
    /// List requests matching the filters, newest first
    pub async fn requests_search(&self, query: &RequestQuery) -> AppResult<Vec<MaintenanceRequest>> {
        let mut rows: Vec<MaintenanceRequest> = self
            .list::<MaintenanceRequest>()
            .await?
            .into_iter()
            .filter(|r| query.matches(r))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    /// Requests scheduled inside `[from, to)`, earliest first
    pub async fn requests_scheduled_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<MaintenanceRequest>> {
        let mut rows: Vec<MaintenanceRequest> = self
            .list::<MaintenanceRequest>()
            .await?
            .into_iter()
            .filter(|r| r.scheduled_date.is_some_and(|d| d >= from && d < to))
            .collect();
        rows.sort_by_key(|r| r.scheduled_date);
        Ok(rows)
    }
}
