//! Maintenance team endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{
        team::{AssignMember, CreateTeam, UpdateTeam},
        Team, UserView,
    },
};

use super::AuthenticatedUser;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TeamListParams {
    /// Include deactivated teams
    pub include_inactive: Option<bool>,
}

/// List teams
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(TeamListParams),
    responses(
        (status = 200, description = "List of teams", body = Vec<Team>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_teams(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<TeamListParams>,
) -> AppResult<Json<Vec<Team>>> {
    let teams = state
        .services
        .teams
        .list(params.include_inactive.unwrap_or(false))
        .await?;
    Ok(Json(teams))
}

/// Create a team (managers)
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    security(("bearer_auth" = [])),
    request_body = CreateTeam,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Manager role required"),
        (status = 409, description = "Team name already exists")
    )
)]
pub async fn create_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateTeam>,
) -> AppResult<(StatusCode, Json<Team>)> {
    claims.require_manager()?;

    let team = state.services.teams.create(data, claims.user_id()).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// Get team by ID
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team details", body = Team),
        (status = 404, description = "Team not found")
    )
)]
pub async fn get_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Team>> {
    let team = state.services.teams.get(&id).await?;
    Ok(Json(team))
}

/// Update a team (managers)
#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Team ID")
    ),
    request_body = UpdateTeam,
    responses(
        (status = 200, description = "Team updated", body = Team),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Team not found"),
        (status = 409, description = "Team name already exists")
    )
)]
pub async fn update_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(data): Json<UpdateTeam>,
) -> AppResult<Json<Team>> {
    claims.require_manager()?;

    let team = state.services.teams.update(&id, data).await?;
    Ok(Json(team))
}

/// Deactivate a team (managers)
#[utoipa::path(
    post,
    path = "/teams/{id}/deactivate",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team deactivated", body = Team),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Team not found")
    )
)]
pub async fn deactivate_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Team>> {
    claims.require_manager()?;

    let team = state.services.teams.deactivate(&id).await?;
    Ok(Json(team))
}

/// List the members of a team
#[utoipa::path(
    get,
    path = "/teams/{id}/members",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team members", body = Vec<UserView>),
        (status = 404, description = "Team not found")
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<UserView>>> {
    let members = state.services.teams.members(&id).await?;
    Ok(Json(members.into_iter().map(UserView::from).collect()))
}

/// Assign a technician to a team (managers)
#[utoipa::path(
    post,
    path = "/teams/{id}/members",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Team ID")
    ),
    request_body = AssignMember,
    responses(
        (status = 200, description = "Technician assigned", body = Team),
        (status = 400, description = "User is not a technician or team is deactivated"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Team or user not found")
    )
)]
pub async fn assign_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(data): Json<AssignMember>,
) -> AppResult<Json<Team>> {
    claims.require_manager()?;

    let team = state
        .services
        .teams
        .assign_technician(&id, &data.user_id)
        .await?;
    Ok(Json(team))
}
