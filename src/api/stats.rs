//! Dashboard and report endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Aggregates shown on the role dashboards
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Active equipment with health below 30
    pub critical_equipment: i64,
    pub active_equipment: i64,
    /// Requests in New or In Progress
    pub open_requests: i64,
    /// Open requests more than a day past their scheduled (or creation) date
    pub overdue_requests: i64,
    /// Percentage of technicians with work scheduled today
    pub technician_utilization: u8,
    pub requests_by_stage: Vec<StatEntry>,
    /// Open requests filed by the caller
    pub my_open_requests: i64,
    /// Open requests assigned to the caller
    pub my_tasks: i64,
    /// Unclaimed New requests of the caller's team
    pub available_requests: i64,
}

/// Request distribution report
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_requests: i64,
    pub requests_by_team: Vec<StatEntry>,
    /// Equipment-targeted requests per equipment category
    pub requests_by_category: Vec<StatEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatEntry {
    /// Label
    pub label: String,
    /// Value
    pub value: i64,
}

/// Dashboard aggregates for the caller
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard aggregates", body = DashboardStats),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardStats>> {
    let stats = state.services.stats.dashboard(claims.user_id()).await?;
    Ok(Json(stats))
}

/// Request counts per team and equipment category (managers)
#[utoipa::path(
    get,
    path = "/reports",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Report", body = ReportStats),
        (status = 403, description = "Manager role required")
    )
)]
pub async fn get_reports(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ReportStats>> {
    claims.require_manager()?;

    let report = state.services.stats.report().await?;
    Ok(Json(report))
}
