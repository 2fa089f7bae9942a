//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, health, requests, stats, teams, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GearGuard API",
        version = "1.0.0",
        description = "Maintenance management REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::logout,
        // Users
        users::list_users,
        users::get_my_profile,
        users::update_my_profile,
        users::get_user,
        users::update_user,
        users::delete_user,
        // Teams
        teams::list_teams,
        teams::create_team,
        teams::get_team,
        teams::update_team,
        teams::deactivate_team,
        teams::list_members,
        teams::assign_member,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::list_equipment_requests,
        equipment::list_work_centers,
        // Requests
        requests::list_requests,
        requests::create_request,
        requests::get_request,
        requests::update_request,
        requests::accept_request,
        requests::set_stage,
        requests::kanban,
        requests::calendar,
        // Stats
        stats::get_dashboard,
        stats::get_reports,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::LogoutResponse,
            // Users
            crate::models::UserView,
            crate::models::UserRole,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            crate::models::user::UserQuery,
            // Teams
            crate::models::Team,
            crate::models::team::CreateTeam,
            crate::models::team::UpdateTeam,
            crate::models::team::AssignMember,
            // Equipment
            crate::models::Equipment,
            crate::models::EquipmentStatus,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::EquipmentQuery,
            // Requests
            crate::models::MaintenanceRequest,
            crate::models::RequestStage,
            crate::models::RequestType,
            crate::models::request::CreateRequest,
            crate::models::request::UpdateRequest,
            crate::models::request::SetStage,
            crate::models::request::AcceptRequest,
            crate::models::request::RequestQuery,
            crate::models::request::CalendarQuery,
            crate::models::request::KanbanColumn,
            // Stats
            stats::DashboardStats,
            stats::ReportStats,
            stats::StatEntry,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup and authentication"),
        (name = "users", description = "User management"),
        (name = "teams", description = "Maintenance teams"),
        (name = "equipment", description = "Equipment registry"),
        (name = "requests", description = "Maintenance request lifecycle"),
        (name = "stats", description = "Dashboards and reports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
